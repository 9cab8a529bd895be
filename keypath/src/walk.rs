//! Field visitation and per-field key-path compilation.

use bumpalo::Bump;
use fieldpath_types::{
    EachFieldOptions, MetadataKind, Reflect, Reflection, TypeHandle, TypeIntrospect,
    internal_invariant_failure, type_of,
};
use tracing::{debug, trace};

use crate::buffer::KeyPathBuffer;
use crate::component::{ComponentHeader, RawComponent, StructOrClass};
use crate::key_path::{AnyKeyPath, KeyPathVariant, PartialKeyPath};

/// One field as seen by a [`visit_fields`] callback.
///
/// `name` is only valid for the duration of the callback.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor<'n, T> {
    pub name: &'n str,
    pub offset: usize,
    pub ty: T,
    pub kind: MetadataKind,
    pub is_var: bool,
    pub is_strong: bool,
}

impl<T> FieldDescriptor<'_, T> {
    /// Whether a stored key path can be compiled for this field.
    pub fn is_supported(&self) -> bool {
        self.kind.supports_stored_component() && self.is_strong
    }
}

fn matches_options<I: TypeIntrospect>(introspector: &I, ty: I::Type, options: EachFieldOptions) -> bool {
    let is_class = introspector.is_reference_type(ty);
    if is_class != options.contains(EachFieldOptions::CLASS_TYPE) {
        debug!(?ty, is_class, ?options, "type does not match the requested root kind");
        return false;
    }
    true
}

/// Calls `callback` for every recursive field of `ty`, in order.
///
/// Returns `false` without visiting anything when `ty` is a reference type
/// and `options` lacks [`EachFieldOptions::CLASS_TYPE`], or the other way
/// around. Returns `false` as soon as `callback` does, `true` otherwise.
pub fn visit_fields<I, F>(introspector: &I, ty: I::Type, options: EachFieldOptions, mut callback: F) -> bool
where
    I: TypeIntrospect,
    F: FnMut(FieldDescriptor<'_, I::Type>) -> bool,
{
    if !matches_options(introspector, ty, options) {
        return false;
    }

    let count = introspector.recursive_field_count(ty);
    let mut names = Bump::new();
    for index in 0..count {
        let keep_going = {
            let record = introspector.field_at(ty, index, &names);
            let descriptor = FieldDescriptor {
                name: record.name,
                offset: introspector.field_offset(ty, index),
                ty: record.ty,
                kind: introspector.metadata_kind(record.ty),
                is_var: record.is_var,
                is_strong: record.is_strong,
            };
            trace!(index, name = descriptor.name, offset = descriptor.offset, kind = %descriptor.kind, "visiting field");
            callback(descriptor)
        };
        names.reset();
        if !keep_going {
            debug!(index, "field visitation stopped by callback");
            return false;
        }
    }
    true
}

/// Builds the single-component buffer for a stored field at `offset`.
fn stored_field_buffer(offset: usize, is_var: bool) -> KeyPathBuffer {
    let offset = match u32::try_from(offset) {
        Ok(offset) => offset,
        Err(_) => internal_invariant_failure!("field offset {offset:#x} doesn't fit in 32 bits"),
    };
    let (header, out_of_line) = ComponentHeader::encode_stored(StructOrClass::Struct, is_var, offset);
    let trailing = out_of_line.map(u32::to_ne_bytes);
    let body = trailing.as_ref().map_or(&[] as &[u8], |bytes| bytes.as_slice());
    KeyPathBuffer::single(RawComponent::new(header, body))
}

/// Compiles a key path for every recursive field of `ty` and hands each to
/// `callback` together with the field's name.
///
/// Gating is the same as for [`visit_fields`]. A field whose kind has no
/// stored representation, or which is not strongly held, is skipped under
/// [`EachFieldOptions::IGNORE_UNKNOWN`] and aborts the walk otherwise.
pub fn compile_field_key_paths<I, F>(
    introspector: &I,
    ty: I::Type,
    options: EachFieldOptions,
    mut callback: F,
) -> bool
where
    I: TypeIntrospect,
    F: FnMut(&str, AnyKeyPath<I::Type>) -> bool,
{
    let ignore_unknown = options.contains(EachFieldOptions::IGNORE_UNKNOWN);
    visit_fields(introspector, ty, options, |field| {
        if !field.is_supported() {
            if ignore_unknown {
                trace!(name = field.name, kind = %field.kind, is_strong = field.is_strong, "skipping unsupported field");
                return true;
            }
            debug!(name = field.name, kind = %field.kind, is_strong = field.is_strong, "unsupported field");
            return false;
        }

        let buffer = stored_field_buffer(field.offset, field.is_var);
        let variant = KeyPathVariant::from_mutability(field.is_var);
        trace!(name = field.name, offset = field.offset, ?variant, "compiled key path");
        callback(field.name, AnyKeyPath::new(ty, field.ty, variant, buffer))
    })
}

/// [`visit_fields`] over `Root`'s static metadata.
pub fn visit_fields_of<Root, F>(options: EachFieldOptions, callback: F) -> bool
where
    Root: Reflect,
    F: FnMut(FieldDescriptor<'_, TypeHandle>) -> bool,
{
    visit_fields(&Reflection, type_of::<Root>(), options, callback)
}

/// [`compile_field_key_paths`] over `Root`'s static metadata, yielding key
/// paths typed by their root.
pub fn compile_field_key_paths_of<Root, F>(options: EachFieldOptions, mut callback: F) -> bool
where
    Root: Reflect,
    F: FnMut(&str, PartialKeyPath<Root>) -> bool,
{
    compile_field_key_paths(&Reflection, type_of::<Root>(), options, |name, key_path| {
        match PartialKeyPath::from_any(key_path) {
            Some(key_path) => callback(name, key_path),
            None => internal_invariant_failure!("compiled key path has the wrong root"),
        }
    })
}
