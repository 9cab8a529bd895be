//! Attribute parsing shared by the derive.

use syn::{Attribute, Path};

/// Options from `#[reflect(...)]` on the type itself.
pub(crate) struct ContainerAttrs {
    /// `#[reflect(class)]`
    pub is_class: bool,
    /// `#[reflect(crate = path)]`, defaults to `::fieldpath_types`.
    pub krate: Path,
}

/// Options from `#[reflect(...)]` on one field.
#[derive(Default)]
pub(crate) struct FieldAttrs {
    pub readonly: bool,
    pub weak: bool,
    pub flatten: bool,
    pub skip: bool,
}

fn reflect_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("reflect"))
}

pub(crate) fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut parsed = ContainerAttrs {
        is_class: false,
        krate: syn::parse_quote!(::fieldpath_types),
    };
    for attr in reflect_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("class") {
                parsed.is_class = true;
                Ok(())
            } else if meta.path.is_ident("crate") {
                parsed.krate = meta.value()?.parse()?;
                Ok(())
            } else {
                Err(meta.error("[fieldpath] expected `class` or `crate = path`"))
            }
        })?;
    }
    Ok(parsed)
}

pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut parsed = FieldAttrs::default();
    for attr in reflect_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            let flag = if meta.path.is_ident("readonly") {
                &mut parsed.readonly
            } else if meta.path.is_ident("weak") {
                &mut parsed.weak
            } else if meta.path.is_ident("flatten") {
                &mut parsed.flatten
            } else if meta.path.is_ident("skip") {
                &mut parsed.skip
            } else {
                return Err(meta.error(
                    "[fieldpath] expected one of `readonly`, `weak`, `flatten`, `skip`",
                ));
            };
            *flag = true;
            Ok(())
        })?;
    }
    Ok(parsed)
}
