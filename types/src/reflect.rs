//! Static reflection for Rust types.
//!
//! A [`Reflect`] type carries a `'static` [`TypeInfo`] table describing its
//! kind and fields. Aggregates get theirs from `#[derive(Reflect)]`; this
//! module covers the standard library types that commonly appear as fields.

use alloc::boxed::Box;
use alloc::rc::{self, Rc};
use alloc::string::String;
use alloc::sync::{self, Arc};
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::error::Error;
use core::marker::PhantomData;
use core::ptr::NonNull;

use crate::info::{FieldInfo, Strength, TypeHandle, TypeInfo};
use crate::kind::MetadataKind;

/// A type with static field metadata.
pub trait Reflect: 'static {
    const TYPE_INFO: &'static TypeInfo;

    /// Ownership strength of a field holding this type.
    const STRENGTH: Strength = Strength::Strong;
}

/// Returns the metadata handle for `T`.
pub fn type_of<T: Reflect>() -> TypeHandle {
    TypeHandle::new(T::TYPE_INFO)
}

macro_rules! impl_leaf {
    ($kind:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl Reflect for $ty {
                const TYPE_INFO: &'static TypeInfo = &TypeInfo::leaf::<$ty>(MetadataKind::$kind);
            }
        )+
    };
}

impl_leaf!(Struct => bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, String);
impl_leaf!(Existential => Box<dyn Any>, Box<dyn Any + Send>, Box<dyn Any + Send + Sync>);
impl_leaf!(ErrorObject => Box<dyn Error + Send + Sync>);
impl_leaf!(ExistentialMetatype => TypeId);

impl<T: Reflect> Reflect for Vec<T> {
    const TYPE_INFO: &'static TypeInfo = &TypeInfo::leaf::<Vec<T>>(MetadataKind::Struct);
}

impl<T: Reflect> Reflect for Option<T> {
    const TYPE_INFO: &'static TypeInfo = &TypeInfo::leaf::<Option<T>>(MetadataKind::Optional);
}

impl<T: 'static> Reflect for PhantomData<T> {
    const TYPE_INFO: &'static TypeInfo = &TypeInfo::leaf::<PhantomData<T>>(MetadataKind::Metatype);
}

// Owning pointers are opaque handles to referenced storage: the field holds a
// reference, so its kind is `class`.
impl<T: Reflect> Reflect for Box<T> {
    const TYPE_INFO: &'static TypeInfo = &TypeInfo::leaf::<Box<T>>(MetadataKind::Class).class();
}

impl<T: Reflect> Reflect for Rc<T> {
    const TYPE_INFO: &'static TypeInfo = &TypeInfo::leaf::<Rc<T>>(MetadataKind::Class).class();
}

impl<T: Reflect> Reflect for Arc<T> {
    const TYPE_INFO: &'static TypeInfo = &TypeInfo::leaf::<Arc<T>>(MetadataKind::Class).class();
}

impl<T: Reflect> Reflect for rc::Weak<T> {
    const TYPE_INFO: &'static TypeInfo = &TypeInfo::leaf::<rc::Weak<T>>(MetadataKind::Optional);
    const STRENGTH: Strength = Strength::Weak;
}

impl<T: Reflect> Reflect for sync::Weak<T> {
    const TYPE_INFO: &'static TypeInfo =
        &TypeInfo::leaf::<sync::Weak<T>>(MetadataKind::Optional);
    const STRENGTH: Strength = Strength::Weak;
}

impl<T: 'static> Reflect for *const T {
    const TYPE_INFO: &'static TypeInfo = &TypeInfo::leaf::<*const T>(MetadataKind::Opaque);
    const STRENGTH: Strength = Strength::Unowned;
}

impl<T: 'static> Reflect for *mut T {
    const TYPE_INFO: &'static TypeInfo = &TypeInfo::leaf::<*mut T>(MetadataKind::Opaque);
    const STRENGTH: Strength = Strength::Unowned;
}

impl<T: 'static> Reflect for NonNull<T> {
    const TYPE_INFO: &'static TypeInfo = &TypeInfo::leaf::<NonNull<T>>(MetadataKind::Opaque);
    const STRENGTH: Strength = Strength::Unowned;
}

impl<R: 'static> Reflect for fn() -> R {
    const TYPE_INFO: &'static TypeInfo = &TypeInfo::leaf::<fn() -> R>(MetadataKind::Function);
}

impl<A: 'static, R: 'static> Reflect for fn(A) -> R {
    const TYPE_INFO: &'static TypeInfo = &TypeInfo::leaf::<fn(A) -> R>(MetadataKind::Function);
}

impl Reflect for () {
    const TYPE_INFO: &'static TypeInfo = &TypeInfo::leaf::<()>(MetadataKind::Tuple);
}

macro_rules! impl_tuple {
    ($(($($name:ident $index:tt),+)),+ $(,)?) => {
        $(
            impl<$($name: Reflect),+> Reflect for ($($name,)+) {
                const TYPE_INFO: &'static TypeInfo = &TypeInfo {
                    fields: &[$(
                        FieldInfo {
                            name: stringify!($index),
                            offset: core::mem::offset_of!(Self, $index),
                            ty: type_of::<$name>,
                            is_var: true,
                            strength: <$name as Reflect>::STRENGTH,
                            flatten: false,
                        },
                    )+],
                    ..TypeInfo::leaf::<($($name,)+)>(MetadataKind::Tuple)
                };
            }
        )+
    };
}

impl_tuple!(
    (A 0),
    (A 0, B 1),
    (A 0, B 1, C 2),
    (A 0, B 1, C 2, D 3),
);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scalars_are_structs() {
        assert_eq!(type_of::<i64>().kind(), MetadataKind::Struct);
        assert_eq!(type_of::<String>().kind(), MetadataKind::Struct);
        assert_eq!(type_of::<Vec<u8>>().kind(), MetadataKind::Struct);
    }

    #[test]
    fn wrapper_kinds() {
        assert_eq!(type_of::<Option<bool>>().kind(), MetadataKind::Optional);
        assert_eq!(type_of::<Box<i32>>().kind(), MetadataKind::Class);
        assert_eq!(type_of::<Arc<i32>>().kind(), MetadataKind::Class);
        assert_eq!(type_of::<Box<dyn Any>>().kind(), MetadataKind::Existential);
        assert_eq!(type_of::<TypeId>().kind(), MetadataKind::ExistentialMetatype);
        assert_eq!(type_of::<PhantomData<u8>>().kind(), MetadataKind::Metatype);
        assert_eq!(type_of::<fn(i32) -> i32>().kind(), MetadataKind::Function);
        assert_eq!(type_of::<*const u8>().kind(), MetadataKind::Opaque);
        assert_eq!(
            type_of::<Box<dyn Error + Send + Sync>>().kind(),
            MetadataKind::ErrorObject
        );
    }

    #[test]
    fn weak_and_raw_pointers_are_not_strong() {
        assert_eq!(<rc::Weak<u8> as Reflect>::STRENGTH, Strength::Weak);
        assert_eq!(<sync::Weak<u8> as Reflect>::STRENGTH, Strength::Weak);
        assert_eq!(<NonNull<u8> as Reflect>::STRENGTH, Strength::Unowned);
        assert_eq!(<Rc<u8> as Reflect>::STRENGTH, Strength::Strong);
    }

    #[test]
    fn tuples_expose_elements() {
        let ty = type_of::<(u8, u32, bool)>();
        assert_eq!(ty.kind(), MetadataKind::Tuple);
        let fields = ty.fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[1].name, "1");
        assert_eq!(fields[1].offset, core::mem::offset_of!((u8, u32, bool), 1));
        assert_eq!(fields[1].field_type(), type_of::<u32>());
        assert!(fields.iter().all(|f| f.is_var && !f.flatten));
    }

    #[test]
    fn unit_has_no_fields() {
        assert_eq!(type_of::<()>().kind(), MetadataKind::Tuple);
        assert!(type_of::<()>().fields().is_empty());
    }
}
