use core::any::TypeId;
use core::{fmt, hash};

use crate::kind::MetadataKind;

/// Ownership strength of a field.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strength {
    /// The field owns (or is) its value.
    #[default]
    Strong,
    /// The field observes a value owned elsewhere and may outlive it.
    Weak,
    /// The field refers to a value owned elsewhere without keeping it alive.
    Unowned,
}

impl Strength {
    pub const fn is_strong(self) -> bool {
        matches!(self, Strength::Strong)
    }
}

/// Static metadata for one type.
///
/// Usually produced by `#[derive(Reflect)]` or the built-in [`Reflect`]
/// implementations, and always reached through a [`TypeHandle`].
///
/// [`Reflect`]: crate::Reflect
pub struct TypeInfo {
    /// Full type name, as reported by [`core::any::type_name`].
    pub name: fn() -> &'static str,
    pub id: fn() -> TypeId,
    /// Raw metadata code; decode with [`MetadataKind::from_raw`].
    pub kind: usize,
    /// Instances live behind a reference and field offsets are relative to
    /// the referenced storage.
    pub is_class: bool,
    pub size: usize,
    pub align: usize,
    /// Direct fields, in declaration order.
    pub fields: &'static [FieldInfo],
}

impl TypeInfo {
    /// Metadata for a type with no introspectable fields.
    ///
    /// Aggregates start from this and fill in `fields` with struct update
    /// syntax, so the field table is promoted along with the `TypeInfo`.
    pub const fn leaf<T: 'static>(kind: MetadataKind) -> Self {
        TypeInfo {
            name: core::any::type_name::<T>,
            id: TypeId::of::<T>,
            kind: kind.raw(),
            is_class: false,
            size: size_of::<T>(),
            align: align_of::<T>(),
            fields: &[],
        }
    }

    /// Marks the type as a reference type.
    pub const fn class(self) -> Self {
        TypeInfo {
            is_class: true,
            ..self
        }
    }
}

/// Static metadata for one field of a [`TypeInfo`].
pub struct FieldInfo {
    /// Declared name; tuple fields use their index.
    pub name: &'static str,
    /// Byte offset from the start of the containing type's storage.
    pub offset: usize,
    pub ty: fn() -> TypeHandle,
    /// The field can be assigned through a mutable root.
    pub is_var: bool,
    pub strength: Strength,
    /// Report this field's own fields in its place.
    pub flatten: bool,
}

impl FieldInfo {
    pub fn field_type(&self) -> TypeHandle {
        (self.ty)()
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("offset", &self.offset)
            .field("ty", &self.field_type())
            .field("is_var", &self.is_var)
            .field("strength", &self.strength)
            .field("flatten", &self.flatten)
            .finish()
    }
}

/// Copyable reference to a type's static metadata.
///
/// Two handles are equal when they describe the same Rust type, even if the
/// tables were emitted more than once.
#[derive(Copy, Clone)]
pub struct TypeHandle(&'static TypeInfo);

static_assertions::assert_eq_size!(TypeHandle, usize);

impl TypeHandle {
    pub const fn new(info: &'static TypeInfo) -> Self {
        TypeHandle(info)
    }

    pub const fn info(self) -> &'static TypeInfo {
        self.0
    }

    pub fn name(self) -> &'static str {
        (self.0.name)()
    }

    pub fn type_id(self) -> TypeId {
        (self.0.id)()
    }

    pub const fn kind(self) -> MetadataKind {
        MetadataKind::from_raw(self.0.kind)
    }

    pub const fn is_class(self) -> bool {
        self.0.is_class
    }

    pub const fn fields(self) -> &'static [FieldInfo] {
        self.0.fields
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.0, other.0) || self.type_id() == other.type_id()
    }
}

impl Eq for TypeHandle {}

impl hash::Hash for TypeHandle {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.type_id().hash(state);
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_of;

    #[test]
    fn handles_compare_by_type() {
        assert_eq!(type_of::<i64>(), type_of::<i64>());
        assert_ne!(type_of::<i64>(), type_of::<u64>());
        assert_ne!(type_of::<Option<bool>>(), type_of::<Option<u8>>());
    }

    #[test]
    fn leaf_records_layout() {
        let ty = type_of::<u16>();
        assert_eq!(ty.info().size, 2);
        assert_eq!(ty.info().align, 2);
        assert_eq!(ty.kind(), MetadataKind::Struct);
        assert!(ty.fields().is_empty());
        assert!(!ty.is_class());
    }

    #[test]
    fn class_marks_reference_types() {
        static INFO: TypeInfo = TypeInfo::leaf::<u8>(MetadataKind::Class).class();
        assert!(TypeHandle::new(&INFO).is_class());
    }

    #[test]
    fn strength() {
        assert!(Strength::default().is_strong());
        assert!(!Strength::Weak.is_strong());
        assert!(!Strength::Unowned.is_strong());
    }
}
