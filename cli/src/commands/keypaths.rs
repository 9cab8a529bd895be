//! The `keypaths` command - compile a key path for every field of a type.

use fieldpath::{
    EachFieldOptions, MetadataKind, Reflection, TypeHandle, TypeIntrospect, TypeRegistry,
    compile_field_key_paths, visit_fields,
};

use crate::cli::KeypathsArgs;
use crate::common::catalog::{lookup, registry};
use crate::common::render::key_path_line;
use crate::common::{CliError, CliResult};

pub fn run(args: KeypathsArgs) -> CliResult<()> {
    let registry = registry();
    let mut options = EachFieldOptions::empty();
    options.set(EachFieldOptions::CLASS_TYPE, args.class_type);
    options.set(EachFieldOptions::IGNORE_UNKNOWN, args.ignore_unknown);

    for line in key_path_lines(&registry, &args.type_name, options)? {
        println!("{line}");
    }
    Ok(())
}

/// Compiles every field of the type registered as `name`, one rendered line
/// per key path. Nothing is returned unless the whole walk succeeds.
pub fn key_path_lines(
    registry: &TypeRegistry,
    name: &str,
    options: EachFieldOptions,
) -> CliResult<Vec<String>> {
    let ty = lookup(registry, name)?;
    let mut lines = Vec::new();
    let complete = compile_field_key_paths(&Reflection, ty, options, |field, key_path| {
        lines.push(key_path_line(name, field, &key_path));
        true
    });
    if complete {
        return Ok(lines);
    }
    Err(explain_rejection(ty, name, options))
}

fn explain_rejection(ty: TypeHandle, name: &str, options: EachFieldOptions) -> CliError {
    let is_class = Reflection.is_reference_type(ty);
    if is_class != options.contains(EachFieldOptions::CLASS_TYPE) {
        return CliError::root_mismatch(name, is_class);
    }

    // Find the field that stopped the walk.
    let mut culprit = None;
    visit_fields(&Reflection, ty, options, |field| {
        if field.is_supported() {
            return true;
        }
        let kind = if field.is_strong {
            field.kind.to_string()
        } else {
            format!("weak {}", field.kind)
        };
        culprit = Some((field.name.to_string(), kind));
        false
    });
    let (field, kind) =
        culprit.unwrap_or_else(|| ("?".to_string(), MetadataKind::Unknown.to_string()));
    CliError::UnsupportedField {
        name: name.to_string(),
        field,
        kind,
    }
}
