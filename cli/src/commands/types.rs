//! The `types` command - list the registered types.

use fieldpath::{Reflection, TypeIntrospect};

use crate::common::catalog::registry;

pub fn run() {
    for (name, ty) in registry().entries() {
        println!("{name}\t{}\t{} fields", ty.kind(), Reflection.recursive_field_count(ty));
    }
}
