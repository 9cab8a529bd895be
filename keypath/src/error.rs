//! Errors reported by the checked (`try_*`) entry points.
//!
//! The unchecked entry points treat the same conditions as internal
//! invariant violations and halt.

use thiserror::Error;

use crate::component::ComponentKind;

/// A component header, or the bytes around it, could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("invalid component header {raw:#010x}: discriminator {discriminator} with payload {payload:#x}")]
    InvalidComponent {
        raw: u32,
        discriminator: u32,
        payload: u32,
    },

    #[error("{kind:?} components have no inline layout")]
    Unsized { kind: ComponentKind },

    #[error("component needs {needed} bytes but only {available} remain")]
    Truncated { needed: usize, available: usize },
}

/// A buffer could not be built as requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("capacity must be a positive multiple of 4 bytes, got {0}")]
    InvalidCapacity(usize),

    #[error("alignment must be a power of two, got {0}")]
    InvalidAlignment(usize),

    #[error("pushing {size} bytes after {padding} bytes of padding overflows the {remaining} remaining")]
    Overflow {
        size: usize,
        padding: usize,
        remaining: usize,
    },

    #[error("key path too big: {0} bytes")]
    TooBig(usize),

    #[error("buffer not fully initialized: {written} of {capacity} bytes written")]
    Incomplete { written: usize, capacity: usize },
}
