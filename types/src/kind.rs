use core::fmt;

/// Classification of a type's runtime metadata.
///
/// The discriminants are the numeric codes reported by a metadata service.
/// They are built from a small index plus three flag bits
/// ([`RUNTIME_PRIVATE_FLAG`](Self::RUNTIME_PRIVATE_FLAG),
/// [`NON_HEAP_FLAG`](Self::NON_HEAP_FLAG),
/// [`NON_TYPE_FLAG`](Self::NON_TYPE_FLAG)). Codes outside the table decode to
/// [`MetadataKind::Unknown`].
#[repr(usize)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MetadataKind {
    Class = 0,
    Struct = 0x200,
    Enum = 0x201,
    Optional = 0x202,
    ForeignClass = 0x203,
    Opaque = 0x300,
    Tuple = 0x301,
    Function = 0x302,
    Existential = 0x303,
    Metatype = 0x304,
    ObjcClassWrapper = 0x305,
    ExistentialMetatype = 0x306,
    HeapLocalVariable = 0x400,
    HeapGenericLocalVariable = 0x500,
    ErrorObject = 0x501,
    Unknown = 0xffff,
}

impl MetadataKind {
    pub const RUNTIME_PRIVATE_FLAG: usize = 0x100;
    pub const NON_HEAP_FLAG: usize = 0x200;
    pub const NON_TYPE_FLAG: usize = 0x400;

    /// Every kind, in code order.
    pub const ALL: [MetadataKind; 16] = [
        MetadataKind::Class,
        MetadataKind::Struct,
        MetadataKind::Enum,
        MetadataKind::Optional,
        MetadataKind::ForeignClass,
        MetadataKind::Opaque,
        MetadataKind::Tuple,
        MetadataKind::Function,
        MetadataKind::Existential,
        MetadataKind::Metatype,
        MetadataKind::ObjcClassWrapper,
        MetadataKind::ExistentialMetatype,
        MetadataKind::HeapLocalVariable,
        MetadataKind::HeapGenericLocalVariable,
        MetadataKind::ErrorObject,
        MetadataKind::Unknown,
    ];

    /// Decodes a raw metadata code. Never fails.
    pub const fn from_raw(raw: usize) -> Self {
        match raw {
            0 => MetadataKind::Class,
            0x200 => MetadataKind::Struct,
            0x201 => MetadataKind::Enum,
            0x202 => MetadataKind::Optional,
            0x203 => MetadataKind::ForeignClass,
            0x300 => MetadataKind::Opaque,
            0x301 => MetadataKind::Tuple,
            0x302 => MetadataKind::Function,
            0x303 => MetadataKind::Existential,
            0x304 => MetadataKind::Metatype,
            0x305 => MetadataKind::ObjcClassWrapper,
            0x306 => MetadataKind::ExistentialMetatype,
            0x400 => MetadataKind::HeapLocalVariable,
            0x500 => MetadataKind::HeapGenericLocalVariable,
            0x501 => MetadataKind::ErrorObject,
            _ => MetadataKind::Unknown,
        }
    }

    pub const fn raw(self) -> usize {
        self as usize
    }

    pub const fn is_runtime_private(self) -> bool {
        self.raw() & Self::RUNTIME_PRIVATE_FLAG != 0
    }

    pub const fn is_heap(self) -> bool {
        self.raw() & Self::NON_HEAP_FLAG == 0
    }

    pub const fn is_type(self) -> bool {
        self.raw() & Self::NON_TYPE_FLAG == 0
    }

    /// Whether a field of this kind can be reached by a stored key-path
    /// component.
    pub const fn supports_stored_component(self) -> bool {
        matches!(
            self,
            MetadataKind::Struct
                | MetadataKind::Class
                | MetadataKind::Optional
                | MetadataKind::Existential
                | MetadataKind::ExistentialMetatype
                | MetadataKind::Tuple
                | MetadataKind::Enum
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            MetadataKind::Class => "class",
            MetadataKind::Struct => "struct",
            MetadataKind::Enum => "enum",
            MetadataKind::Optional => "optional",
            MetadataKind::ForeignClass => "foreignClass",
            MetadataKind::Opaque => "opaque",
            MetadataKind::Tuple => "tuple",
            MetadataKind::Function => "function",
            MetadataKind::Existential => "existential",
            MetadataKind::Metatype => "metatype",
            MetadataKind::ObjcClassWrapper => "objcClassWrapper",
            MetadataKind::ExistentialMetatype => "existentialMetatype",
            MetadataKind::HeapLocalVariable => "heapLocalVariable",
            MetadataKind::HeapGenericLocalVariable => "heapGenericLocalVariable",
            MetadataKind::ErrorObject => "errorObject",
            MetadataKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<usize> for MetadataKind {
    fn from(raw: usize) -> Self {
        MetadataKind::from_raw(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn known_codes_decode_to_themselves() {
        for kind in MetadataKind::ALL {
            assert_eq!(MetadataKind::from_raw(kind.raw()), kind);
        }
    }

    #[test]
    fn unrecognized_codes_fall_back_to_unknown() {
        assert_eq!(MetadataKind::from_raw(1), MetadataKind::Unknown);
        assert_eq!(MetadataKind::from_raw(0x204), MetadataKind::Unknown);
        assert_eq!(MetadataKind::from_raw(0x7ff), MetadataKind::Unknown);
        assert_eq!(MetadataKind::from(usize::MAX), MetadataKind::Unknown);
    }

    #[test]
    fn flag_bits() {
        assert!(MetadataKind::Class.is_heap());
        assert!(!MetadataKind::Struct.is_heap());
        assert!(!MetadataKind::Struct.is_runtime_private());
        assert!(MetadataKind::Tuple.is_runtime_private());
        assert!(MetadataKind::Tuple.is_type());
        assert!(!MetadataKind::HeapLocalVariable.is_type());
        assert!(MetadataKind::ErrorObject.is_runtime_private());
    }

    #[test]
    fn stored_component_support() {
        let supported: alloc::vec::Vec<_> = MetadataKind::ALL
            .into_iter()
            .filter(|k| k.supports_stored_component())
            .collect();
        assert_eq!(
            supported,
            [
                MetadataKind::Class,
                MetadataKind::Struct,
                MetadataKind::Enum,
                MetadataKind::Optional,
                MetadataKind::Tuple,
                MetadataKind::Existential,
                MetadataKind::ExistentialMetatype,
            ]
        );
    }

    #[test]
    fn display_uses_metadata_names() {
        assert_eq!(alloc::format!("{}", MetadataKind::ExistentialMetatype), "existentialMetatype");
    }
}
