//! The `fields` command - list the recursive fields of a type.

use fieldpath::{EachFieldOptions, Reflection, TypeIntrospect, visit_fields};

use crate::cli::FieldsArgs;
use crate::common::catalog::{lookup, registry};
use crate::common::render::field_line;
use crate::common::{CliError, CliResult};

pub fn run(args: FieldsArgs) -> CliResult<()> {
    let registry = registry();
    let ty = lookup(&registry, &args.type_name)?;
    let mut options = EachFieldOptions::empty();
    options.set(EachFieldOptions::CLASS_TYPE, args.class_type);

    let mut lines = Vec::new();
    if !visit_fields(&Reflection, ty, options, |field| {
        lines.push(field_line(&field));
        true
    }) {
        return Err(CliError::root_mismatch(
            &args.type_name,
            Reflection.is_reference_type(ty),
        ));
    }

    for line in lines {
        println!("{line}");
    }
    Ok(())
}
