use syn::{parse_quote, Attribute, Path};

// #[testbean(crate = path::to::testbean)]
pub(crate) fn testbean_path(attrs: &[Attribute]) -> syn::Result<Path> {
    let mut testbean_path = None;
    let mut errors = Vec::new();

    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("testbean"))
        .for_each(|attr| {
            if let Err(err) = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("crate") {
                    if testbean_path.is_some() {
                        return Err(meta.error("duplicate `crate` argument"));
                    }
                    let path = meta.value()?.call(Path::parse_mod_style)?;
                    testbean_path = Some(path);
                    Ok(())
                } else {
                    Err(meta.error("the argument must be `crate`"))
                }
            }) {
                errors.push(err);
            }
        });

    if let Some(e) = errors.into_iter().reduce(|mut a, b| {
        a.combine(b);
        a
    }) {
        return Err(e);
    }

    Ok(testbean_path.unwrap_or_else(|| parse_quote!(::testbean)))
}
