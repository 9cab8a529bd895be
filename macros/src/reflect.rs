//! Implementation of `#[derive(Reflect)]`.

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Index, LitStr, Member};

use crate::common::{parse_container_attrs, parse_field_attrs};

pub(crate) fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "[fieldpath] Reflect cannot be derived for generic types",
        ));
    }

    let container = parse_container_attrs(&input.attrs)?;
    let krate = &container.krate;
    let name = &input.ident;

    let (kind, fields) = match &input.data {
        Data::Struct(data) => (quote!(Struct), field_table(krate, &data.fields)?),
        Data::Enum(_) => (quote!(Enum), Vec::new()),
        Data::Union(data) => {
            return Err(syn::Error::new_spanned(
                data.union_token,
                "[fieldpath] Reflect cannot be derived for unions",
            ));
        }
    };
    let is_class = container.is_class;
    let kind = if is_class { quote!(Class) } else { kind };

    Ok(quote! {
        impl #krate::Reflect for #name {
            const TYPE_INFO: &'static #krate::TypeInfo = &#krate::TypeInfo {
                is_class: #is_class,
                fields: &[#(#fields),*],
                ..#krate::TypeInfo::leaf::<#name>(#krate::MetadataKind::#kind)
            };
        }
    })
}

fn field_table(krate: &syn::Path, fields: &Fields) -> syn::Result<Vec<TokenStream2>> {
    let mut table = Vec::new();
    for (index, field) in fields.iter().enumerate() {
        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        let (member, label) = match &field.ident {
            Some(ident) => (Member::Named(ident.clone()), ident.to_string()),
            None => (Member::Unnamed(Index::from(index)), index.to_string()),
        };
        let label = LitStr::new(&label, proc_macro2::Span::call_site());
        let ty = &field.ty;
        let is_var = !attrs.readonly;
        let flatten = attrs.flatten;
        let strength = if attrs.weak {
            quote!(#krate::Strength::Weak)
        } else {
            quote!(<#ty as #krate::Reflect>::STRENGTH)
        };

        table.push(quote! {
            #krate::FieldInfo {
                name: #label,
                offset: ::core::mem::offset_of!(Self, #member),
                ty: #krate::type_of::<#ty>,
                is_var: #is_var,
                strength: #strength,
                flatten: #flatten,
            }
        });
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_str(tokens: TokenStream2) -> Result<String, String> {
        let input: DeriveInput = syn::parse2(tokens).unwrap();
        expand(input).map(|out| out.to_string()).map_err(|e| e.to_string())
    }

    #[test]
    fn named_fields() {
        let out = expand_str(quote! {
            struct S {
                a: u8,
                #[reflect(readonly)]
                b: u16,
            }
        })
        .unwrap();
        assert!(out.contains("name : \"a\""));
        assert!(out.contains("offset_of ! (Self , b)"));
        assert!(out.contains("is_var : false"));
        assert!(out.contains("MetadataKind :: Struct"));
    }

    #[test]
    fn class_containers_report_class_kind() {
        let out = expand_str(quote! {
            #[reflect(class)]
            struct Object {
                a: u32,
            }
        })
        .unwrap();
        assert!(out.contains("is_class : true"));
        assert!(out.contains("MetadataKind :: Class"));
        assert!(!out.contains("MetadataKind :: Struct"));
    }

    #[test]
    fn tuple_fields_use_indices() {
        let out = expand_str(quote!(struct P(u8, #[reflect(skip)] u8, u32);)).unwrap();
        assert!(out.contains("name : \"0\""));
        assert!(!out.contains("name : \"1\""));
        assert!(out.contains("name : \"2\""));
        assert!(out.contains("offset_of ! (Self , 2)"));
    }

    #[test]
    fn weak_overrides_strength() {
        let out = expand_str(quote! {
            struct S {
                #[reflect(weak)]
                p: *const u8,
            }
        })
        .unwrap();
        assert!(out.contains("Strength :: Weak"));
    }

    #[test]
    fn enums_have_no_fields() {
        let out = expand_str(quote!(enum E { A, B(u8) })).unwrap();
        assert!(out.contains("MetadataKind :: Enum"));
        assert!(out.contains("fields : & []"));
    }

    #[test]
    fn generics_are_rejected() {
        let error = expand_str(quote!(struct W<T>(T);)).unwrap_err();
        assert!(error.contains("generic"));
        assert!(expand_str(quote!(struct L<'a>(&'a u8);)).is_err());
    }

    #[test]
    fn unions_are_rejected() {
        let error = expand_str(quote!(union U { a: u8 })).unwrap_err();
        assert!(error.contains("unions"));
    }
}
