//! The `demo` command - key paths for every field of `MyStruct`.

use fieldpath::EachFieldOptions;

use crate::common::CliResult;
use crate::common::catalog::registry;
use crate::commands::keypaths::key_path_lines;

pub fn run() -> CliResult<()> {
    for line in key_path_lines(&registry(), "MyStruct", EachFieldOptions::empty())? {
        println!("{line}");
    }
    Ok(())
}
