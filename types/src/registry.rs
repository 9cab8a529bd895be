use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::info::TypeHandle;
use crate::reflect::{Reflect, type_of};

/// Name-indexed set of reflected types.
///
/// Lets callers that only have a type's name (command lines, configuration)
/// find its metadata.
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    by_name: HashMap<&'static str, TypeHandle>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under `name`, replacing any previous entry.
    pub fn register<T: Reflect>(&mut self, name: &'static str) -> &mut Self {
        self.insert(name, type_of::<T>());
        self
    }

    pub fn insert(&mut self, name: &'static str, ty: TypeHandle) -> Option<TypeHandle> {
        self.by_name.insert(name, ty)
    }

    pub fn get(&self, name: &str) -> Option<TypeHandle> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Registered entries, sorted by name.
    pub fn entries(&self) -> Vec<(&'static str, TypeHandle)> {
        let mut entries: Vec<_> = self.by_name.iter().map(|(name, ty)| (*name, *ty)).collect();
        entries.sort_unstable_by_key(|(name, _)| *name);
        entries
    }
}
