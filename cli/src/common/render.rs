//! Text rendering of fields and key paths.

use fieldpath::{AnyKeyPath, FieldDescriptor, KeyPathVariant, TypeHandle};

/// `+16 var z: core::option::Option<bool> [optional]`
pub fn field_line(field: &FieldDescriptor<'_, TypeHandle>) -> String {
    let binding = if field.is_var { "var" } else { "let" };
    let strength = if field.is_strong { "" } else { "weak " };
    format!(
        "+{} {strength}{binding} {}: {} [{}]",
        field.offset, field.name, field.ty, field.kind
    )
}

/// `x: WritableKeyPath<MyStruct, i64> [struct +0, mutable]`
pub fn key_path_line(root_name: &str, field_name: &str, key_path: &AnyKeyPath<TypeHandle>) -> String {
    let variant = match key_path.variant() {
        KeyPathVariant::ReadOnly => "KeyPath",
        KeyPathVariant::Writable => "WritableKeyPath",
    };
    let components: Vec<String> = key_path
        .components()
        .map(|component| match component {
            Ok(component) => component.to_string(),
            Err(error) => format!("<{error}>"),
        })
        .collect();
    format!(
        "{field_name}: {variant}<{root_name}, {}> [{}]",
        key_path.leaf(),
        components.join(" / ")
    )
}
