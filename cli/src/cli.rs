//! Command-line interface definitions.
//!
//! Only clap definitions live here. The implementations are in `commands`.

use clap::{Args, Parser, Subcommand};

/// fieldpath - inspect reflected types and their field key paths
#[derive(Parser, Debug)]
#[command(name = "fieldpath", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile and print the key paths of the `MyStruct` demo type
    Demo,

    /// List the fields of a registered type
    Fields(FieldsArgs),

    /// Compile and print a key path for every field of a registered type
    Keypaths(KeypathsArgs),

    /// List the registered types
    Types,
}

/// Arguments for the `fields` command.
#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// Registered type name (see `fieldpath types`)
    #[arg(value_name = "TYPE")]
    pub type_name: String,

    /// Walk a class (reference) type
    #[arg(long)]
    pub class_type: bool,
}

/// Arguments for the `keypaths` command.
#[derive(Args, Debug)]
pub struct KeypathsArgs {
    /// Registered type name (see `fieldpath types`)
    #[arg(value_name = "TYPE")]
    pub type_name: String,

    /// Skip fields that have no stored key path instead of failing
    #[arg(long)]
    pub ignore_unknown: bool,

    /// Walk a class (reference) type
    #[arg(long)]
    pub class_type: bool,
}
