//! The type metadata service consumed by the field walker.

use core::fmt::{self, Debug};

use bumpalo::Bump;
use smallvec::SmallVec;

use crate::info::{FieldInfo, TypeHandle};
use crate::kind::MetadataKind;

/// Metadata about one field, as reported by [`TypeIntrospect::field_at`].
///
/// `name` lives in the arena passed to `field_at`, which the walker resets
/// after every field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FieldRecord<'n, T> {
    pub name: &'n str,
    pub ty: T,
    pub is_var: bool,
    pub is_strong: bool,
}

/// Runtime type introspection.
///
/// Field indices run over the *recursive* field list: `0..recursive_field_count(ty)`.
/// Implementations must report the same fields in the same order every time
/// they are asked about a type, and `field_offset` must agree with `field_at`
/// for every index. Out-of-range indices are a contract violation.
pub trait TypeIntrospect {
    /// Handle identifying a type.
    type Type: Copy + Debug;

    /// Whether instances of `ty` live behind a reference.
    fn is_reference_type(&self, ty: Self::Type) -> bool;

    /// The numeric metadata code of `ty`.
    fn raw_metadata_kind(&self, ty: Self::Type) -> usize;

    fn metadata_kind(&self, ty: Self::Type) -> MetadataKind {
        MetadataKind::from_raw(self.raw_metadata_kind(ty))
    }

    fn recursive_field_count(&self, ty: Self::Type) -> usize;

    /// Describes field `index` of `ty`. Names that have to be synthesized are
    /// allocated in `names`.
    fn field_at<'n>(&self, ty: Self::Type, index: usize, names: &'n Bump)
    -> FieldRecord<'n, Self::Type>;

    /// Byte offset of field `index` from the start of `ty`'s storage.
    fn field_offset(&self, ty: Self::Type, index: usize) -> usize;
}

/// [`TypeIntrospect`] over static [`TypeInfo`](crate::TypeInfo) tables.
///
/// Fields marked `flatten` are replaced by their own recursive fields, with
/// offsets measured from the root and names qualified as `outer.inner`.
/// Flattening stops at references: a flattened `Box<T>` or class-typed field
/// is reported as a single field.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Reflection;

/// A field reached from a root through zero or more flattened fields.
struct Resolved {
    path: SmallVec<[&'static FieldInfo; 4]>,
    offset: usize,
}

impl Resolved {
    fn leaf(&self) -> &'static FieldInfo {
        self.path[self.path.len() - 1]
    }
}

/// The type whose fields stand in for `field`, if it is flattened.
///
/// Only inline aggregates are flattened. A `flatten` field holding a
/// reference, a leaf or an empty aggregate is reported as itself.
fn flattened(field: &FieldInfo) -> Option<TypeHandle> {
    if !field.flatten {
        return None;
    }
    let nested = field.field_type();
    let inline = matches!(nested.kind(), MetadataKind::Struct | MetadataKind::Tuple) && !nested.is_class();
    (inline && !nested.fields().is_empty()).then_some(nested)
}

fn count(ty: TypeHandle) -> usize {
    ty.fields()
        .iter()
        .map(|field| flattened(field).map_or(1, count))
        .sum()
}

fn resolve(ty: TypeHandle, mut index: usize) -> Option<Resolved> {
    let mut path = SmallVec::new();
    let mut offset = 0;
    let mut fields = ty.fields();

    'descend: loop {
        for field in fields {
            if let Some(nested) = flattened(field) {
                let n = count(nested);
                if index < n {
                    path.push(field);
                    offset += field.offset;
                    fields = nested.fields();
                    continue 'descend;
                }
                index -= n;
            } else if index == 0 {
                path.push(field);
                return Some(Resolved {
                    path,
                    offset: offset + field.offset,
                });
            } else {
                index -= 1;
            }
        }
        return None;
    }
}

impl Reflection {
    fn resolve_or_fail(ty: TypeHandle, index: usize) -> Resolved {
        match resolve(ty, index) {
            Some(resolved) => resolved,
            None => crate::internal_invariant_failure!(
                "field index {index} out of range for {ty:?} ({} fields)",
                count(ty)
            ),
        }
    }
}

impl TypeIntrospect for Reflection {
    type Type = TypeHandle;

    fn is_reference_type(&self, ty: TypeHandle) -> bool {
        ty.is_class()
    }

    fn raw_metadata_kind(&self, ty: TypeHandle) -> usize {
        ty.info().kind
    }

    fn recursive_field_count(&self, ty: TypeHandle) -> usize {
        count(ty)
    }

    fn field_at<'n>(&self, ty: TypeHandle, index: usize, names: &'n Bump) -> FieldRecord<'n, TypeHandle> {
        let resolved = Self::resolve_or_fail(ty, index);
        let leaf = resolved.leaf();

        let name: &'n str = if resolved.path.len() == 1 {
            leaf.name
        } else {
            let mut qualified = bumpalo::collections::String::new_in(names);
            for (i, field) in resolved.path.iter().enumerate() {
                if i > 0 {
                    qualified.push('.');
                }
                qualified.push_str(field.name);
            }
            qualified.into_bump_str()
        };

        FieldRecord {
            name,
            ty: leaf.field_type(),
            is_var: resolved.path.iter().all(|field| field.is_var),
            is_strong: leaf.strength.is_strong(),
        }
    }

    fn field_offset(&self, ty: TypeHandle, index: usize) -> usize {
        Self::resolve_or_fail(ty, index).offset
    }
}

impl fmt::Display for FieldRecord<'_, TypeHandle> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let binding = if self.is_var { "var" } else { "let" };
        let strength = if self.is_strong { "" } else { "weak " };
        write!(f, "{strength}{binding} {}: {}", self.name, self.ty)
    }
}
