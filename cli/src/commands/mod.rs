//! Command implementations.
//!
//! Each subcommand has its own module with a `run` function.

pub mod demo;
pub mod fields;
pub mod keypaths;
pub mod types;
