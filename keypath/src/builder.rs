//! Bump-style writer over a caller-allocated byte region.
//!
//! The region is borrowed for the whole construction, so the bytes cannot be
//! observed by anyone else until the builder is dropped.

use fieldpath_types::internal_invariant_failure;

use crate::buffer::BufferHeader;
use crate::component::ComponentHeader;
use crate::error::BuildError;

/// A fixed-size value written in native byte order.
pub trait Word: Copy {
    const SIZE: usize;

    fn write_to(self, out: &mut [u8]);
}

macro_rules! impl_word {
    ($($ty:ty),+) => {
        $(
            impl Word for $ty {
                const SIZE: usize = size_of::<$ty>();

                fn write_to(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_ne_bytes());
                }
            }
        )+
    };
}

impl_word!(u8, u16, u32, u64, usize);

impl Word for ComponentHeader {
    const SIZE: usize = ComponentHeader::SIZE;

    fn write_to(self, out: &mut [u8]) {
        self.raw().write_to(out)
    }
}

impl Word for BufferHeader {
    const SIZE: usize = BufferHeader::SIZE;

    fn write_to(self, out: &mut [u8]) {
        self.raw().write_to(out)
    }
}

/// Cursor over the bytes of a key-path buffer under construction.
///
/// Alignment is measured from the start of the region, which the caller
/// guarantees to be pointer-aligned.
#[derive(Debug)]
pub struct Builder<'a> {
    buffer: &'a mut [u8],
    position: usize,
}

impl<'a> Builder<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Builder {
            buffer,
            position: 0,
        }
    }

    /// Bytes written (including padding) so far.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    /// Reserves `size` bytes at the next multiple of `alignment` and returns
    /// them. Padding bytes are zeroed.
    pub fn try_push_raw(&mut self, size: usize, alignment: usize) -> Result<&mut [u8], BuildError> {
        if !alignment.is_power_of_two() {
            return Err(BuildError::InvalidAlignment(alignment));
        }
        let padding = self.position.next_multiple_of(alignment) - self.position;
        let remaining = self.remaining();
        let end = match padding.checked_add(size) {
            Some(needed) if needed <= remaining => self.position + needed,
            _ => {
                return Err(BuildError::Overflow {
                    size,
                    padding,
                    remaining,
                });
            }
        };
        let start = self.position + padding;
        self.buffer[self.position..start].fill(0);
        self.position = end;
        Ok(&mut self.buffer[start..end])
    }

    /// [`try_push_raw`](Self::try_push_raw), treating failure as an internal
    /// invariant violation.
    pub fn push_raw(&mut self, size: usize, alignment: usize) -> &mut [u8] {
        match self.try_push_raw(size, alignment) {
            Ok(bytes) => bytes,
            Err(error) => internal_invariant_failure!("{error}"),
        }
    }

    /// Writes `value` at its natural alignment.
    pub fn push<T: Word>(&mut self, value: T) {
        value.write_to(self.push_raw(T::SIZE, T::SIZE));
    }

    pub fn push_u32(&mut self, value: u32) {
        self.push(value);
    }

    /// Writes the buffer header and the skew that pointer-aligns the first
    /// component.
    pub fn push_header(&mut self, header: BufferHeader) {
        self.push(header);
        self.push_raw(ComponentHeader::POINTER_ALIGNMENT_SKEW, 4);
    }
}
