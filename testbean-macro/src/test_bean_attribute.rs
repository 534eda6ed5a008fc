use proc_macro2::{Span, TokenStream};
use quote::{quote, ToTokens};
use syn::{spanned::Spanned, Attribute, Expr, Ident, Meta, Path};
use testbean_core::BeanOverrideStrategy;

// #[test_bean(
//     name = "..",
//     method = path::to::factory,
//     fallible,
//     create_if_missing,
// )]

pub(crate) struct TestBeanAttribute {
    name: Option<(Span, Expr)>,
    method: Option<(Span, Path)>,
    fallible: Option<Span>,
    create_if_missing: Option<Span>,
}

impl TryFrom<&Attribute> for TestBeanAttribute {
    type Error = syn::Error;

    fn try_from(attr: &Attribute) -> Result<Self, Self::Error> {
        let mut name: Option<(Span, Expr)> = None;
        let mut method: Option<(Span, Path)> = None;
        let mut fallible: Option<Span> = None;
        let mut create_if_missing: Option<Span> = None;

        if let Meta::Path(_) = attr.meta {
            return Ok(TestBeanAttribute {
                name,
                method,
                fallible,
                create_if_missing,
            });
        }

        attr.parse_nested_meta(|meta| {
            macro_rules! check_duplicate {
                ($attribute:tt) => {
                    if $attribute.is_some() {
                        return Err(meta.error(concat!(
                            "the `",
                            stringify!($attribute),
                            "` attribute can only be set once"
                        )));
                    }
                };
            }

            let meta_path = &meta.path;
            let meta_path_span = meta_path.span();

            if meta_path.is_ident("name") {
                check_duplicate!(name);
                name = Some((meta_path_span, meta.value()?.parse::<Expr>()?));
                return Ok(());
            }

            if meta_path.is_ident("method") {
                check_duplicate!(method);
                method = Some((meta_path_span, meta.value()?.call(Path::parse_mod_style)?));
                return Ok(());
            }

            if meta_path.is_ident("fallible") {
                check_duplicate!(fallible);
                fallible = Some(meta_path_span);
                return Ok(());
            }

            if meta_path.is_ident("create_if_missing") {
                check_duplicate!(create_if_missing);
                create_if_missing = Some(meta_path_span);
                return Ok(());
            }

            Err(meta.error(
                "the attribute must be one of: `name`, `method`, `fallible`, `create_if_missing`",
            ))
        })?;

        Ok(TestBeanAttribute {
            name,
            method,
            fallible,
            create_if_missing,
        })
    }
}

impl TestBeanAttribute {
    pub(crate) fn from_attrs(attrs: &[Attribute]) -> syn::Result<Option<TestBeanAttribute>> {
        let mut test_bean_attr = None;
        let mut errors = Vec::with_capacity(2);
        let mut already_appeared = false;

        attrs
            .iter()
            .filter(|attr| attr.path().is_ident("test_bean"))
            .for_each(|attr| {
                if already_appeared {
                    let err = syn::Error::new(
                        attr.span(),
                        "only one `#[test_bean(..)]` attribute is allowed",
                    );
                    errors.push(err);
                } else {
                    match TestBeanAttribute::try_from(attr) {
                        Ok(o) => test_bean_attr = Some(o),
                        Err(e) => errors.push(e),
                    }
                }

                already_appeared = true;
            });

        if let Some(e) = errors.into_iter().reduce(|mut a, b| {
            a.combine(b);
            a
        }) {
            return Err(e);
        }

        Ok(test_bean_attr)
    }

    /// `field` is the field carrying the attribute, used when no `method` is set.
    pub(crate) fn simplify(self, field: &Ident) -> SimpleTestBeanAttribute {
        let TestBeanAttribute {
            name,
            method,
            fallible,
            create_if_missing,
        } = self;

        let (method_name, method_path) = match method {
            Some((_, path)) => match path.get_ident() {
                Some(ident) => (ident.to_string(), quote!(Self::#ident)),
                None => (
                    path.to_token_stream().to_string().replace(' ', ""),
                    quote!(#path),
                ),
            },
            None => (field.to_string(), quote!(Self::#field)),
        };

        SimpleTestBeanAttribute {
            name: name.map(|(_, expr)| quote!(#expr)),
            method_name,
            method_path,
            fallible: fallible.is_some(),
            strategy: if create_if_missing.is_some() {
                BeanOverrideStrategy::ReplaceOrCreateDefinition
            } else {
                BeanOverrideStrategy::ReplaceDefinition
            },
        }
    }
}

pub(crate) struct SimpleTestBeanAttribute {
    pub(crate) name: Option<TokenStream>,
    pub(crate) method_name: String,
    pub(crate) method_path: TokenStream,
    pub(crate) fallible: bool,
    pub(crate) strategy: BeanOverrideStrategy,
}
