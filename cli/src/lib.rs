//! fieldpath CLI library.
//!
//! The modules are public so the integration tests can reach the demo types.

pub mod cli;
pub mod commands;
pub mod common;
