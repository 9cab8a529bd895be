//! Error handling for the CLI.

use thiserror::Error;

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("unknown type `{0}` (run `fieldpath types` for the list)")]
    UnknownType(String),

    #[error("`{name}` is {actual} but {expected} was requested{hint}")]
    RootMismatch {
        name: String,
        actual: &'static str,
        expected: &'static str,
        hint: &'static str,
    },

    #[error("`{name}.{field}` is a {kind} field with no stored key path (pass --ignore-unknown to skip it)")]
    UnsupportedField {
        name: String,
        field: String,
        kind: String,
    },
}

impl CliError {
    pub fn root_mismatch(name: &str, is_class: bool) -> Self {
        if is_class {
            CliError::RootMismatch {
                name: name.to_string(),
                actual: "a class type",
                expected: "a value type",
                hint: " (pass --class-type)",
            }
        } else {
            CliError::RootMismatch {
                name: name.to_string(),
                actual: "a value type",
                expected: "a class type",
                hint: "",
            }
        }
    }
}

/// Print an error to stderr and exit with code 1.
pub fn report_and_exit(error: CliError) -> ! {
    eprintln!("error: {error}");
    std::process::exit(1);
}
