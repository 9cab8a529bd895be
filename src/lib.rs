//! fieldpath - reflective field walking and precompiled key paths
//!
//! # Overview
//!
//! Derive [`Reflect`] on a struct to give it static field metadata, then ask
//! for a key path to each of its fields. A key path is a small owned buffer
//! that records where the field lives relative to its root, so later accesses
//! don't have to repeat the metadata lookup.
//!
//! # Quick Start
//!
//! ```
//! use fieldpath::{EachFieldOptions, Reflect, compile_field_key_paths_of};
//!
//! #[derive(Reflect)]
//! #[reflect(crate = fieldpath::types)]
//! #[repr(C)]
//! struct Point {
//!     x: f64,
//!     #[reflect(readonly)]
//!     y: f64,
//! }
//!
//! let mut fields = Vec::new();
//! let complete = compile_field_key_paths_of::<Point, _>(EachFieldOptions::empty(), |name, key_path| {
//!     fields.push((name.to_string(), key_path.stored_offset(), key_path.is_writable()));
//!     true
//! });
//!
//! assert!(complete);
//! assert_eq!(fields, [("x".to_string(), Some(0), true), ("y".to_string(), Some(8), false)]);
//! ```
//!
//! # Metadata services
//!
//! The walker is generic over [`TypeIntrospect`]. [`Reflection`] serves the
//! tables generated by `#[derive(Reflect)]`; other services can plug in any
//! metadata source that reports fields by index.

pub use fieldpath_keypath as keypath;
pub use fieldpath_types as types;

pub use fieldpath_keypath::{
    AnyKeyPath, BufferHeader, BuildError, ComponentHeader, ComponentKind, FieldDescriptor,
    HeaderError, KeyPath, KeyPathBuffer, KeyPathVariant, PartialKeyPath, RawComponent,
    WritableKeyPath, compile_field_key_paths, compile_field_key_paths_of, visit_fields,
    visit_fields_of,
};
pub use fieldpath_macros::Reflect;
pub use fieldpath_types::{
    EachFieldOptions, MetadataKind, Reflect, Reflection, TypeHandle, TypeIntrospect,
    TypeRegistry, type_of,
};
