//! Shared utilities for CLI commands.

pub mod catalog;
pub mod error;
pub mod render;

pub use error::{CliError, CliResult};
