//! The types the CLI knows about.

use std::rc::{Rc, Weak};

use fieldpath::{Reflect, TypeHandle, TypeRegistry};

use crate::common::{CliError, CliResult};

/// The demo type: four stored fields of different sizes.
#[derive(Reflect)]
#[repr(C)]
pub struct MyStruct {
    pub x: i64,
    pub y: f64,
    pub z: Option<bool>,
    pub w: i16,
}

#[derive(Reflect)]
#[repr(C)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Reflect)]
#[repr(C)]
pub struct Line {
    #[reflect(flatten)]
    pub start: Point,
    #[reflect(flatten)]
    pub end: Point,
}

#[derive(Reflect)]
#[reflect(class)]
pub struct Account {
    #[reflect(readonly)]
    pub id: u64,
    pub owner: Rc<String>,
    pub balance: i64,
}

#[derive(Reflect)]
pub struct Observer {
    pub count: u32,
    pub on_change: fn(u32) -> u32,
    pub subject: Weak<Account>,
    pub tag: (u8, u8),
}

#[derive(Reflect)]
pub struct Pair(pub u16, #[reflect(readonly)] pub u64);

#[derive(Reflect)]
pub enum Direction {
    North,
    South,
}

pub fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register::<Account>("Account")
        .register::<Direction>("Direction")
        .register::<Line>("Line")
        .register::<MyStruct>("MyStruct")
        .register::<Observer>("Observer")
        .register::<Pair>("Pair")
        .register::<Point>("Point");
    registry
}

pub fn lookup(registry: &TypeRegistry, name: &str) -> CliResult<TypeHandle> {
    registry
        .get(name)
        .ok_or_else(|| CliError::UnknownType(name.to_string()))
}
