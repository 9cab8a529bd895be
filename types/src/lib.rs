//! Type metadata for the fieldpath reflective field walker.
//!
//! This crate describes what the walker needs to know about a type: its
//! [`MetadataKind`], whether it is a reference type, and the byte offset,
//! type, mutability and ownership strength of every field. The description is
//! consumed through the [`TypeIntrospect`] trait, so the walker does not care
//! where it comes from. [`Reflection`] implements it over static
//! [`TypeInfo`] tables, which `#[derive(Reflect)]` generates for Rust types.
//!
//! # Example
//!
//! ```
//! use fieldpath_types::{Bump, Reflection, TypeIntrospect, type_of};
//!
//! let names = Bump::new();
//! let ty = type_of::<(i64, bool)>();
//! assert_eq!(Reflection.recursive_field_count(ty), 2);
//! assert_eq!(Reflection.field_at(ty, 1, &names).name, "1");
//! ```

#![no_std]
extern crate alloc;

pub mod invariant;

mod info;
mod introspect;
mod kind;
mod options;
mod reflect;
mod registry;

pub use info::{FieldInfo, Strength, TypeHandle, TypeInfo};
pub use introspect::{FieldRecord, Reflection, TypeIntrospect};
pub use kind::MetadataKind;
pub use options::EachFieldOptions;
pub use reflect::{Reflect, type_of};
pub use registry::TypeRegistry;

// Re-exported so derived code and downstream crates agree on the arena type.
pub use bumpalo::Bump;
