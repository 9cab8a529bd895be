//! Key-path components and their 32-bit headers.
//!
//! A component header packs a 7-bit discriminator, a 24-bit payload and the
//! end-of-reference-prefix flag into one word:
//!
//! ```text
//!  31  30      24 23                      0
//! [E] [discrim.  ] [payload                ]
//! ```
//!
//! Stored (`struct` / `class`) components split the payload again into a
//! mutable flag (bit 23) and a 23-bit offset. Offsets above
//! [`ComponentHeader::MAXIMUM_OFFSET_PAYLOAD`] are written as the
//! [`ComponentHeader::OUT_OF_LINE_OFFSET_PAYLOAD`] sentinel followed by a
//! 32-bit offset word.

use core::fmt;

use fieldpath_types::{internal_invariant, internal_invariant_failure};

use crate::builder::Builder;
use crate::error::HeaderError;

/// What a component does to the value it is applied to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// References an externally defined property whose descriptor says how
    /// to interact with it.
    External,
    /// Projects within the storage of the outer value, like a stored field
    /// of a struct.
    Struct,
    /// Projects from the referenced storage, like a stored field of a class.
    Class,
    /// Projects through a getter/setter pair.
    Computed,
    /// Returns `None` if the input is `None`, else projects the wrapped value.
    OptionalChain,
    /// Traps if the input is `None`, else projects the wrapped value.
    OptionalForce,
    /// Wraps the value in an optional.
    OptionalWrap,
}

/// Where a stored field lives relative to its root.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StructOrClass {
    Struct,
    Class,
}

/// Decoded offset of a stored component.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StoredOffset {
    Inline(u32),
    OutOfLine(u32),
    UnresolvedField,
    UnresolvedIndirect,
}

impl StoredOffset {
    pub const fn resolved(self) -> Option<u32> {
        match self {
            StoredOffset::Inline(offset) | StoredOffset::OutOfLine(offset) => Some(offset),
            StoredOffset::UnresolvedField | StoredOffset::UnresolvedIndirect => None,
        }
    }
}

/// The 32-bit header word of a component.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ComponentHeader(u32);

static_assertions::assert_eq_size!(ComponentHeader, u32);

impl ComponentHeader {
    pub const SIZE: usize = size_of::<u32>();

    pub const PAYLOAD_MASK: u32 = 0x00FF_FFFF;
    pub const DISCRIMINATOR_MASK: u32 = 0x7F00_0000;
    pub const DISCRIMINATOR_SHIFT: u32 = 24;

    pub const EXTERNAL_TAG: u32 = 0;
    pub const STRUCT_TAG: u32 = 1;
    pub const COMPUTED_TAG: u32 = 2;
    pub const CLASS_TAG: u32 = 3;
    pub const OPTIONAL_TAG: u32 = 4;

    pub const OPTIONAL_CHAIN_PAYLOAD: u32 = 0;
    pub const OPTIONAL_WRAP_PAYLOAD: u32 = 1;
    pub const OPTIONAL_FORCE_PAYLOAD: u32 = 2;

    pub const END_OF_REFERENCE_PREFIX_FLAG: u32 = 0x8000_0000;

    pub const STORED_MUTABLE_FLAG: u32 = 0x0080_0000;
    pub const STORED_OFFSET_PAYLOAD_MASK: u32 = 0x007F_FFFF;
    pub const MAXIMUM_OFFSET_PAYLOAD: u32 = 0x007F_FFFB;
    pub const UNRESOLVED_FIELD_OFFSET_PAYLOAD: u32 = 0x007F_FFFC;
    pub const OUT_OF_LINE_OFFSET_PAYLOAD: u32 = 0x007F_FFFD;
    pub const UNRESOLVED_INDIRECT_OFFSET_PAYLOAD: u32 = 0x007F_FFFE;

    /// Padding after a 4-byte header so that a following pointer-sized
    /// field is aligned.
    pub const POINTER_ALIGNMENT_SKEW: usize = size_of::<usize>() - size_of::<u32>();

    pub const fn from_raw(raw: u32) -> Self {
        ComponentHeader(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub fn new(discriminator: u32, payload: u32) -> Self {
        let mut header = ComponentHeader(0);
        header.set_discriminator(discriminator);
        header.set_payload(payload);
        header
    }

    /// Header of a stored component whose offset fits inline.
    pub fn stored(kind: StructOrClass, mutable: bool, inline_offset: u32) -> Self {
        let discriminator = match kind {
            StructOrClass::Struct => Self::STRUCT_TAG,
            StructOrClass::Class => Self::CLASS_TAG,
        };
        internal_invariant!(
            inline_offset <= Self::MAXIMUM_OFFSET_PAYLOAD,
            "inline offset {inline_offset:#x} doesn't fit"
        );
        let payload = inline_offset | if mutable { Self::STORED_MUTABLE_FLAG } else { 0 };
        Self::new(discriminator, payload)
    }

    /// Encodes a stored component, moving the offset out of line when it
    /// does not fit the payload.
    pub fn encode_stored(kind: StructOrClass, mutable: bool, offset: u32) -> (Self, Option<u32>) {
        if offset <= Self::MAXIMUM_OFFSET_PAYLOAD {
            return (Self::stored(kind, mutable, offset), None);
        }
        let mut header = Self::stored(kind, mutable, 0);
        header.set_stored_offset_payload(Self::OUT_OF_LINE_OFFSET_PAYLOAD);
        (header, Some(offset))
    }

    /// Header of an optional-chain, -force or -wrap component.
    pub fn optional(kind: ComponentKind) -> Self {
        let payload = match kind {
            ComponentKind::OptionalChain => Self::OPTIONAL_CHAIN_PAYLOAD,
            ComponentKind::OptionalWrap => Self::OPTIONAL_WRAP_PAYLOAD,
            ComponentKind::OptionalForce => Self::OPTIONAL_FORCE_PAYLOAD,
            other => internal_invariant_failure!("{other:?} is not an optional component"),
        };
        Self::new(Self::OPTIONAL_TAG, payload)
    }

    pub const fn discriminator(self) -> u32 {
        (self.0 & Self::DISCRIMINATOR_MASK) >> Self::DISCRIMINATOR_SHIFT
    }

    pub fn set_discriminator(&mut self, discriminator: u32) {
        let shifted = discriminator << Self::DISCRIMINATOR_SHIFT;
        internal_invariant!(
            discriminator <= Self::DISCRIMINATOR_MASK >> Self::DISCRIMINATOR_SHIFT,
            "discriminator {discriminator} doesn't fit"
        );
        self.0 = (self.0 & !Self::DISCRIMINATOR_MASK) | (shifted & Self::DISCRIMINATOR_MASK);
    }

    pub const fn payload(self) -> u32 {
        self.0 & Self::PAYLOAD_MASK
    }

    pub fn set_payload(&mut self, payload: u32) {
        internal_invariant!(
            payload & Self::PAYLOAD_MASK == payload,
            "payload {payload:#x} too big"
        );
        self.0 = (self.0 & !Self::PAYLOAD_MASK) | (payload & Self::PAYLOAD_MASK);
    }

    pub fn stored_offset_payload(self) -> u32 {
        internal_invariant!(self.is_stored(), "not a stored component");
        self.0 & Self::STORED_OFFSET_PAYLOAD_MASK
    }

    pub fn set_stored_offset_payload(&mut self, payload: u32) {
        internal_invariant!(self.is_stored(), "not a stored component");
        internal_invariant!(
            payload & Self::STORED_OFFSET_PAYLOAD_MASK == payload,
            "payload {payload:#x} too big"
        );
        self.0 = (self.0 & !Self::STORED_OFFSET_PAYLOAD_MASK)
            | (payload & Self::STORED_OFFSET_PAYLOAD_MASK);
    }

    pub fn is_stored_mutable(self) -> bool {
        internal_invariant!(self.is_stored(), "not a stored component");
        self.0 & Self::STORED_MUTABLE_FLAG != 0
    }

    pub const fn end_of_reference_prefix(self) -> bool {
        self.0 & Self::END_OF_REFERENCE_PREFIX_FLAG != 0
    }

    pub fn set_end_of_reference_prefix(&mut self, value: bool) {
        if value {
            self.0 |= Self::END_OF_REFERENCE_PREFIX_FLAG;
        } else {
            self.0 &= !Self::END_OF_REFERENCE_PREFIX_FLAG;
        }
    }

    pub fn with_end_of_reference_prefix(mut self, value: bool) -> Self {
        self.set_end_of_reference_prefix(value);
        self
    }

    const fn is_stored(self) -> bool {
        matches!(self.discriminator(), Self::STRUCT_TAG | Self::CLASS_TAG)
    }

    /// Looks the (discriminator, payload) pair up in the component table.
    pub const fn try_kind(self) -> Result<ComponentKind, HeaderError> {
        match (self.discriminator(), self.payload()) {
            (Self::EXTERNAL_TAG, _) => Ok(ComponentKind::External),
            (Self::STRUCT_TAG, _) => Ok(ComponentKind::Struct),
            (Self::CLASS_TAG, _) => Ok(ComponentKind::Class),
            (Self::COMPUTED_TAG, _) => Ok(ComponentKind::Computed),
            (Self::OPTIONAL_TAG, Self::OPTIONAL_CHAIN_PAYLOAD) => Ok(ComponentKind::OptionalChain),
            (Self::OPTIONAL_TAG, Self::OPTIONAL_WRAP_PAYLOAD) => Ok(ComponentKind::OptionalWrap),
            (Self::OPTIONAL_TAG, Self::OPTIONAL_FORCE_PAYLOAD) => Ok(ComponentKind::OptionalForce),
            (discriminator, payload) => Err(HeaderError::InvalidComponent {
                raw: self.0,
                discriminator,
                payload,
            }),
        }
    }

    /// The component kind. An invalid header is an internal consistency
    /// failure.
    pub fn kind(self) -> ComponentKind {
        match self.try_kind() {
            Ok(kind) => kind,
            Err(error) => internal_invariant_failure!("{error}"),
        }
    }

    /// Decodes the offset of a stored component. `body` holds the bytes
    /// following the header.
    pub fn try_stored_offset(self, body: &[u8]) -> Result<StoredOffset, HeaderError> {
        match self.stored_offset_payload() {
            Self::OUT_OF_LINE_OFFSET_PAYLOAD => read_u32(body, 0).map(StoredOffset::OutOfLine),
            Self::UNRESOLVED_FIELD_OFFSET_PAYLOAD => Ok(StoredOffset::UnresolvedField),
            Self::UNRESOLVED_INDIRECT_OFFSET_PAYLOAD => Ok(StoredOffset::UnresolvedIndirect),
            inline => Ok(StoredOffset::Inline(inline)),
        }
    }

    /// Total size of the component this header starts, trailing words included.
    pub fn try_component_size(self) -> Result<usize, HeaderError> {
        match self.try_kind()? {
            ComponentKind::Struct | ComponentKind::Class
                if self.stored_offset_payload() == Self::OUT_OF_LINE_OFFSET_PAYLOAD =>
            {
                Ok(Self::SIZE + size_of::<u32>())
            }
            ComponentKind::Struct
            | ComponentKind::Class
            | ComponentKind::OptionalChain
            | ComponentKind::OptionalForce
            | ComponentKind::OptionalWrap => Ok(Self::SIZE),
            kind @ (ComponentKind::Computed | ComponentKind::External) => {
                Err(HeaderError::Unsized { kind })
            }
        }
    }
}

impl fmt::Debug for ComponentHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentHeader")
            .field("raw", &format_args!("{:#010x}", self.0))
            .field("discriminator", &self.discriminator())
            .field("payload", &format_args!("{:#x}", self.payload()))
            .field("end_of_reference_prefix", &self.end_of_reference_prefix())
            .finish()
    }
}

pub(crate) fn read_u32(bytes: &[u8], at: usize) -> Result<u32, HeaderError> {
    let needed = at + size_of::<u32>();
    match bytes.get(at..needed) {
        Some(word) => {
            let mut raw = [0; 4];
            raw.copy_from_slice(word);
            Ok(u32::from_ne_bytes(raw))
        }
        None => Err(HeaderError::Truncated {
            needed,
            available: bytes.len(),
        }),
    }
}

/// A component as laid out in a key-path buffer: its header plus the bytes
/// that follow it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RawComponent<'a> {
    pub header: ComponentHeader,
    pub body: &'a [u8],
}

impl<'a> RawComponent<'a> {
    pub fn new(header: ComponentHeader, body: &'a [u8]) -> Self {
        RawComponent { header, body }
    }

    /// Splits the component starting at the front of `bytes` from the rest.
    pub fn try_parse(bytes: &'a [u8]) -> Result<(Self, &'a [u8]), HeaderError> {
        let header = ComponentHeader::from_raw(read_u32(bytes, 0)?);
        let size = header.try_component_size()?;
        if bytes.len() < size {
            return Err(HeaderError::Truncated {
                needed: size,
                available: bytes.len(),
            });
        }
        let (component, rest) = bytes.split_at(size);
        Ok((RawComponent::new(header, &component[ComponentHeader::SIZE..]), rest))
    }

    pub fn kind(&self) -> ComponentKind {
        self.header.kind()
    }

    /// Resolved byte offset of a stored component; `None` for other kinds or
    /// unresolved offsets.
    pub fn stored_offset(&self) -> Option<u32> {
        match self.kind() {
            ComponentKind::Struct | ComponentKind::Class => {
                match self.header.try_stored_offset(self.body) {
                    Ok(offset) => offset.resolved(),
                    Err(error) => internal_invariant_failure!("{error}"),
                }
            }
            _ => None,
        }
    }

    /// Appends a copy of this component to `buffer`.
    pub fn clone_into(&self, buffer: &mut Builder<'_>, end_of_reference_prefix: bool) {
        let header = self.header.with_end_of_reference_prefix(end_of_reference_prefix);
        match header.kind() {
            ComponentKind::Struct | ComponentKind::Class => {
                buffer.push(header);
                if header.stored_offset_payload() == ComponentHeader::OUT_OF_LINE_OFFSET_PAYLOAD {
                    match read_u32(self.body, 0) {
                        Ok(offset) => buffer.push(offset),
                        Err(error) => internal_invariant_failure!("{error}"),
                    }
                }
            }
            ComponentKind::OptionalChain
            | ComponentKind::OptionalForce
            | ComponentKind::OptionalWrap => buffer.push(header),
            // Field metadata has no getter/setter to build these from.
            ComponentKind::Computed => {
                panic!("key paths to computed properties can't be built from field metadata")
            }
            ComponentKind::External => {
                internal_invariant_failure!("external components should have been instantiated away")
            }
        }
    }
}

impl fmt::Display for RawComponent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            kind @ (ComponentKind::Struct | ComponentKind::Class) => {
                let tag = if kind == ComponentKind::Struct { "struct" } else { "class" };
                match self.header.try_stored_offset(self.body) {
                    Ok(StoredOffset::Inline(offset)) => write!(f, "{tag} +{offset}")?,
                    Ok(StoredOffset::OutOfLine(offset)) => write!(f, "{tag} +{offset} (out of line)")?,
                    Ok(StoredOffset::UnresolvedField) => write!(f, "{tag} +?field")?,
                    Ok(StoredOffset::UnresolvedIndirect) => write!(f, "{tag} +?indirect")?,
                    Err(error) => write!(f, "{tag} <{error}>")?,
                }
                if self.header.is_stored_mutable() {
                    f.write_str(", mutable")?;
                }
                Ok(())
            }
            ComponentKind::OptionalChain => f.write_str("?"),
            ComponentKind::OptionalForce => f.write_str("!"),
            ComponentKind::OptionalWrap => f.write_str("wrap?"),
            ComponentKind::Computed => f.write_str("computed"),
            ComponentKind::External => f.write_str("external"),
        }
    }
}
