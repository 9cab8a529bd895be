//! Compact, precompiled access paths to the fields of reflected types.
//!
//! [`compile_field_key_paths`] walks the fields of a type through a
//! [`TypeIntrospect`](fieldpath_types::TypeIntrospect) service and produces,
//! for each one, an [`AnyKeyPath`] whose buffer encodes where the field lives.

#![no_std]

extern crate alloc;

pub mod buffer;
pub mod builder;
pub mod component;
pub mod error;
pub mod key_path;
pub mod walk;

pub use buffer::{BufferHeader, Components, KeyPathBuffer};
pub use builder::{Builder, Word};
pub use component::{ComponentHeader, ComponentKind, RawComponent, StoredOffset, StructOrClass};
pub use error::{BuildError, HeaderError};
pub use key_path::{AnyKeyPath, KeyPath, KeyPathVariant, PartialKeyPath, WritableKeyPath};
pub use walk::{
    FieldDescriptor, compile_field_key_paths, compile_field_key_paths_of, visit_fields,
    visit_fields_of,
};

pub use fieldpath_types::EachFieldOptions;
