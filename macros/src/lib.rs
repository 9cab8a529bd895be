//! Derive macro for `fieldpath_types::Reflect`.

extern crate proc_macro;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod common;
mod reflect;

/// Derives static field metadata for a struct or enum.
///
/// Struct fields are reported in declaration order with offsets taken from
/// [`core::mem::offset_of!`]. Tuple-struct fields are named by index. Enums
/// are reported with kind `Enum` and no fields. Generic types and unions are
/// rejected.
///
/// # Attributes
///
/// On the type:
/// - `#[reflect(class)]`: instances live behind a reference, so field
///   walkers need the class-type option to accept it as a root.
/// - `#[reflect(crate = path)]`: path to the metadata crate, when it is not
///   reachable as `::fieldpath_types`.
///
/// On a field:
/// - `#[reflect(readonly)]`: the field cannot be assigned through the root.
/// - `#[reflect(weak)]`: the field does not own its value.
/// - `#[reflect(flatten)]`: report the field's own fields in its place.
/// - `#[reflect(skip)]`: leave the field out.
///
/// ```ignore
/// use fieldpath::Reflect;
///
/// #[derive(Reflect)]
/// struct Account {
///     #[reflect(readonly)]
///     id: u64,
///     balance: i64,
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match reflect::expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
