//! The owned byte buffer behind a key path.
//!
//! Layout: a 32-bit [`BufferHeader`], padding up to pointer size, then the
//! component records back to back.

use alloc::boxed::Box;
use alloc::vec;
use core::fmt;

use fieldpath_types::{internal_invariant, internal_invariant_failure};

use crate::builder::Builder;
use crate::component::{ComponentHeader, RawComponent, read_u32};
use crate::error::{BuildError, HeaderError};

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct BufferHeader(u32);

impl BufferHeader {
    pub const SIZE: usize = size_of::<u32>();

    pub const SIZE_MASK: u32 = 0x00FF_FFFF;
    pub const RESERVED_MASK: u32 = 0x1F00_0000;
    pub const SINGLE_COMPONENT_FLAG: u32 = 0x2000_0000;
    pub const HAS_REFERENCE_PREFIX_FLAG: u32 = 0x4000_0000;
    pub const TRIVIAL_FLAG: u32 = 0x8000_0000;

    /// `size` counts the component bytes, excluding this header and its skew.
    pub fn new(size: usize, trivial: bool, has_reference_prefix: bool) -> Self {
        internal_invariant!(
            size <= Self::SIZE_MASK as usize,
            "key path too big: {size} bytes"
        );
        Self::encode(size as u32 & Self::SIZE_MASK, trivial, has_reference_prefix)
    }

    pub fn try_new(size: usize, trivial: bool, has_reference_prefix: bool) -> Result<Self, BuildError> {
        match u32::try_from(size) {
            Ok(size) if size <= Self::SIZE_MASK => Ok(Self::encode(size, trivial, has_reference_prefix)),
            _ => Err(BuildError::TooBig(size)),
        }
    }

    const fn encode(size: u32, trivial: bool, has_reference_prefix: bool) -> Self {
        let mut raw = size;
        if trivial {
            raw |= Self::TRIVIAL_FLAG;
        }
        if has_reference_prefix {
            raw |= Self::HAS_REFERENCE_PREFIX_FLAG;
        }
        BufferHeader(raw)
    }

    pub const fn from_raw(raw: u32) -> Self {
        BufferHeader(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn size(self) -> usize {
        (self.0 & Self::SIZE_MASK) as usize
    }

    pub const fn is_trivial(self) -> bool {
        self.0 & Self::TRIVIAL_FLAG != 0
    }

    pub const fn has_reference_prefix(self) -> bool {
        self.0 & Self::HAS_REFERENCE_PREFIX_FLAG != 0
    }

    pub const fn is_single_component(self) -> bool {
        self.0 & Self::SINGLE_COMPONENT_FLAG != 0
    }

    pub const fn reserved(self) -> u32 {
        self.0 & Self::RESERVED_MASK
    }
}

impl fmt::Debug for BufferHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferHeader")
            .field("size", &self.size())
            .field("trivial", &self.is_trivial())
            .field("has_reference_prefix", &self.has_reference_prefix())
            .field("single_component", &self.is_single_component())
            .finish()
    }
}

/// A frozen key-path buffer. Written once at construction, read-only
/// afterwards.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct KeyPathBuffer {
    bytes: Box<[u8]>,
}

impl KeyPathBuffer {
    /// Bytes taken by the header and its skew.
    pub const HEADER_SIZE: usize = size_of::<usize>();

    /// Allocates `capacity` bytes and lets `init` fill them. `init` must
    /// write exactly `capacity` bytes.
    pub fn create(capacity: usize, init: impl FnOnce(&mut Builder<'_>)) -> Self {
        match Self::try_create(capacity, init) {
            Ok(buffer) => buffer,
            Err(error) => internal_invariant_failure!("{error}"),
        }
    }

    pub fn try_create(
        capacity: usize,
        init: impl FnOnce(&mut Builder<'_>),
    ) -> Result<Self, BuildError> {
        if capacity == 0 || capacity % 4 != 0 {
            return Err(BuildError::InvalidCapacity(capacity));
        }
        let mut bytes = vec![0u8; capacity].into_boxed_slice();
        let written = {
            let mut builder = Builder::new(&mut bytes);
            init(&mut builder);
            builder.position()
        };
        if written != capacity {
            return Err(BuildError::Incomplete { written, capacity });
        }
        Ok(KeyPathBuffer { bytes })
    }

    /// A trivial buffer holding a copy of `component` and nothing else.
    pub fn single(component: RawComponent<'_>) -> Self {
        let size = ComponentHeader::SIZE + component.body.len();
        Self::create(Self::HEADER_SIZE + size, |builder| {
            builder.push_header(BufferHeader::new(size, true, false));
            component.clone_into(builder, false);
        })
    }

    pub fn header(&self) -> BufferHeader {
        match read_u32(&self.bytes, 0) {
            Ok(raw) => BufferHeader::from_raw(raw),
            Err(error) => internal_invariant_failure!("{error}"),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// The component records, without the header.
    pub fn component_bytes(&self) -> &[u8] {
        let end = Self::HEADER_SIZE + self.header().size();
        self.bytes.get(Self::HEADER_SIZE..end).unwrap_or(&[])
    }

    pub fn components(&self) -> Components<'_> {
        Components {
            rest: self.component_bytes(),
        }
    }
}

impl fmt::Debug for KeyPathBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPathBuffer")
            .field("header", &self.header())
            .field("components", &DisplayList(self))
            .finish()
    }
}

struct DisplayList<'a>(&'a KeyPathBuffer);

impl fmt::Debug for DisplayList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for component in self.0.components() {
            match component {
                Ok(component) => list.entry(&format_args!("{component}")),
                Err(error) => list.entry(&format_args!("<{error}>")),
            };
        }
        list.finish()
    }
}

/// Iterator over the components of a [`KeyPathBuffer`].
///
/// Stops after the first decoding error.
#[derive(Clone, Debug)]
pub struct Components<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for Components<'a> {
    type Item = Result<RawComponent<'a>, HeaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        match RawComponent::try_parse(self.rest) {
            Ok((component, rest)) => {
                self.rest = rest;
                Some(Ok(component))
            }
            Err(error) => {
                self.rest = &[];
                Some(Err(error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentKind, StructOrClass};
    use pretty_assertions::assert_eq;

    type H = BufferHeader;

    #[test]
    fn header_flags() {
        let header = H::new(12, true, false);
        assert_eq!(header.size(), 12);
        assert!(header.is_trivial());
        assert!(!header.has_reference_prefix());
        assert!(!header.is_single_component());
        assert_eq!(header.reserved(), 0);

        let header = H::from_raw(H::SINGLE_COMPONENT_FLAG | H::HAS_REFERENCE_PREFIX_FLAG | 4);
        assert!(header.is_single_component());
        assert!(header.has_reference_prefix());
        assert!(!header.is_trivial());
        assert_eq!(header.size(), 4);
    }

    #[test]
    fn masks_are_disjoint() {
        let masks = [
            H::SIZE_MASK,
            H::RESERVED_MASK,
            H::SINGLE_COMPONENT_FLAG,
            H::HAS_REFERENCE_PREFIX_FLAG,
            H::TRIVIAL_FLAG,
        ];
        let mut seen = 0u32;
        for mask in masks {
            assert_eq!(seen & mask, 0);
            seen |= mask;
        }
        assert_eq!(seen, u32::MAX);
    }

    #[test]
    fn oversized_header_is_rejected() {
        assert_eq!(H::try_new(0x0100_0000, true, false), Err(BuildError::TooBig(0x0100_0000)));
        assert_eq!(H::try_new(H::SIZE_MASK as usize, true, false).map(H::size), Ok(0x00FF_FFFF));
    }

    #[test]
    #[cfg_attr(not(any(debug_assertions, feature = "internal-checks")), ignore = "internal checks are off")]
    #[should_panic(expected = "key path too big")]
    fn oversized_header_is_fatal() {
        H::new(1 << 24, false, false);
    }

    fn single_struct(offset: u32, mutable: bool) -> KeyPathBuffer {
        let (header, extra) = ComponentHeader::encode_stored(StructOrClass::Struct, mutable, offset);
        let body = extra.map(u32::to_ne_bytes);
        KeyPathBuffer::single(RawComponent::new(header, body.as_ref().map_or(&[] as &[u8], |b| b.as_slice())))
    }

    #[test]
    fn single_optional_component() {
        let force = ComponentHeader::optional(ComponentKind::OptionalForce);
        let buffer = KeyPathBuffer::single(RawComponent::new(force, &[]));
        assert_eq!(buffer.capacity(), KeyPathBuffer::HEADER_SIZE + 4);
        let component = buffer.components().next().unwrap().unwrap();
        assert_eq!(component.kind(), ComponentKind::OptionalForce);
        assert!(!component.header.end_of_reference_prefix());
    }

    #[test]
    #[should_panic(expected = "computed properties")]
    fn single_computed_component_panics() {
        KeyPathBuffer::single(RawComponent::new(ComponentHeader::new(ComponentHeader::COMPUTED_TAG, 0), &[]));
    }

    #[test]
    #[should_panic(expected = "external components")]
    fn single_external_component_is_fatal() {
        KeyPathBuffer::single(RawComponent::new(ComponentHeader::new(ComponentHeader::EXTERNAL_TAG, 0), &[]));
    }

    #[test]
    fn reads_back_components() {
        let buffer = single_struct(16, true);
        assert_eq!(buffer.capacity(), KeyPathBuffer::HEADER_SIZE + 4);
        assert_eq!(buffer.header().size(), buffer.capacity() - size_of::<usize>());

        let components: alloc::vec::Vec<_> = buffer.components().collect::<Result<_, _>>().unwrap();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].kind(), ComponentKind::Struct);
        assert_eq!(components[0].stored_offset(), Some(16));
        assert!(components[0].header.is_stored_mutable());
    }

    #[test]
    fn out_of_line_component_reads_back() {
        let buffer = single_struct(0x0200_0000, false);
        assert_eq!(buffer.capacity(), KeyPathBuffer::HEADER_SIZE + 8);
        let component = buffer.components().next().unwrap().unwrap();
        assert_eq!(component.stored_offset(), Some(0x0200_0000));
    }

    #[test]
    fn capacity_must_be_positive_multiple_of_four() {
        assert_eq!(KeyPathBuffer::try_create(0, |_| {}), Err(BuildError::InvalidCapacity(0)));
        assert_eq!(KeyPathBuffer::try_create(6, |_| {}), Err(BuildError::InvalidCapacity(6)));
    }

    #[test]
    fn partially_written_buffer_is_rejected() {
        assert_eq!(
            KeyPathBuffer::try_create(12, |builder| builder.push_u32(0)),
            Err(BuildError::Incomplete {
                written: 4,
                capacity: 12,
            })
        );
    }

    #[test]
    fn invalid_component_stops_iteration() {
        let size = 8;
        let buffer = KeyPathBuffer::create(KeyPathBuffer::HEADER_SIZE + size, |builder| {
            builder.push_header(BufferHeader::new(size, true, false));
            builder.push(ComponentHeader::new(ComponentHeader::OPTIONAL_TAG, 9));
            builder.push(ComponentHeader::optional(ComponentKind::OptionalChain));
        });
        let mut components = buffer.components();
        assert!(components.next().unwrap().is_err());
        assert!(components.next().is_none());
    }

    #[test]
    fn clones_are_independent_copies() {
        let buffer = single_struct(4, false);
        let copy = buffer.clone();
        assert_eq!(copy, buffer);
        assert_ne!(copy.as_bytes().as_ptr(), buffer.as_bytes().as_ptr());
    }
}
