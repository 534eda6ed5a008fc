use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Fields, Path};
use testbean_core::BeanOverrideStrategy;

use crate::{
    test_bean_attribute::{SimpleTestBeanAttribute, TestBeanAttribute},
    testbean_path_attribute,
};

pub(crate) fn generate(input: DeriveInput) -> syn::Result<TokenStream> {
    let testbean_path = testbean_path_attribute::testbean_path(&input.attrs)?;

    let fields = match input.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            fields => {
                return Err(syn::Error::new(
                    fields.span(),
                    "only structs with named fields are supported",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new(
                input.ident.span(),
                "expected a struct with named fields",
            ))
        }
    };

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "not support generic test structs, please remove generics",
        ));
    }

    let mut overrides = Vec::new();
    let mut idents = Vec::with_capacity(fields.len());
    let mut values = Vec::with_capacity(fields.len());

    for field in fields.iter() {
        // named fields always have an ident
        let Some(ident) = &field.ident else {
            continue;
        };
        let ty = &field.ty;
        let field_name = ident.to_string();

        idents.push(ident.clone());

        let Some(attr) = TestBeanAttribute::from_attrs(&field.attrs)? else {
            values.push(quote! {
                ::core::default::Default::default()
            });
            continue;
        };

        let SimpleTestBeanAttribute {
            name,
            method_name,
            method_path,
            fallible,
            strategy,
        } = attr.simplify(ident);

        let field_expr = quote! {
            #testbean_path::Field::new::<Self, #ty>(#field_name)
        };

        let method = if fallible {
            quote! {
                #testbean_path::FactoryMethod::fallible::<Self, #ty, _>(#method_name, #method_path)
            }
        } else {
            quote! {
                #testbean_path::FactoryMethod::new::<Self, #ty>(#method_name, #method_path)
            }
        };

        let name = name.map(|name| quote!(.name(#name)));

        let strategy = match strategy {
            BeanOverrideStrategy::ReplaceDefinition => quote! {},
            strategy => {
                let variant = format_ident!("{}", strategy.as_str());
                quote! {
                    .strategy(#testbean_path::BeanOverrideStrategy::#variant)
                }
            }
        };

        overrides.push(quote! {
            #testbean_path::TestBeanOverride::new(#field_expr, #method)
                #name
                #strategy
        });

        values.push(quote! {
            cx.resolve_test_bean::<#ty>(&#field_expr)
        });
    }

    let struct_ident = &input.ident;

    Ok(generate_impl(
        &testbean_path,
        struct_ident,
        overrides,
        idents,
        values,
    ))
}

fn generate_impl(
    testbean_path: &Path,
    struct_ident: &syn::Ident,
    overrides: Vec<TokenStream>,
    idents: Vec<syn::Ident>,
    values: Vec<TokenStream>,
) -> TokenStream {
    quote! {
        impl #testbean_path::TestBeans for #struct_ident {
            fn test_bean_overrides() -> ::std::vec::Vec<#testbean_path::TestBeanOverride> {
                ::std::vec![
                    #(
                        #overrides,
                    )*
                ]
            }

            #[allow(unused_variables)]
            fn inject(cx: &mut #testbean_path::Context) -> Self {
                Self {
                    #(
                        #idents: #values,
                    )*
                }
            }
        }
    }
}
