//! End-to-end: metadata service through to read-back of compiled buffers.

#![allow(dead_code)]

use std::mem::offset_of;

use bumpalo::Bump;
use fieldpath::types::FieldRecord;
use fieldpath::{
    ComponentHeader, ComponentKind, EachFieldOptions, KeyPathBuffer, KeyPathVariant,
    MetadataKind, Reflect, TypeIntrospect, compile_field_key_paths, compile_field_key_paths_of,
    visit_fields,
};
use pretty_assertions::assert_eq;

fn init_test_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_test_writer()
        .try_init();
}

#[derive(Reflect)]
#[reflect(crate = fieldpath::types)]
#[repr(C)]
struct MyStruct {
    x: i64,
    y: f64,
    z: Option<bool>,
    w: i16,
}

#[test]
fn my_struct_yields_four_stored_key_paths() {
    init_test_logging();
    for options in [EachFieldOptions::empty(), EachFieldOptions::IGNORE_UNKNOWN] {
        assert_eq!(my_struct_key_paths(options), expected_my_struct_key_paths(), "{options:?}");
    }
    assert_eq!(
        [offset_of!(MyStruct, x), offset_of!(MyStruct, y), offset_of!(MyStruct, z), offset_of!(MyStruct, w)],
        [0, 8, 16, 18]
    );
}

fn expected_my_struct_key_paths() -> Vec<(String, Option<u32>, KeyPathVariant)> {
    vec![
        ("x".to_string(), Some(offset_of!(MyStruct, x) as u32), KeyPathVariant::Writable),
        ("y".to_string(), Some(offset_of!(MyStruct, y) as u32), KeyPathVariant::Writable),
        ("z".to_string(), Some(offset_of!(MyStruct, z) as u32), KeyPathVariant::Writable),
        ("w".to_string(), Some(offset_of!(MyStruct, w) as u32), KeyPathVariant::Writable),
    ]
}

fn my_struct_key_paths(options: EachFieldOptions) -> Vec<(String, Option<u32>, KeyPathVariant)> {
    let mut seen = Vec::new();
    let complete = compile_field_key_paths_of::<MyStruct, _>(options, |name, key_path| {
        let buffer = key_path.buffer();
        let header = buffer.header();
        assert!(header.is_trivial());
        assert!(!header.has_reference_prefix());
        assert_eq!(header.size(), buffer.capacity() - size_of::<usize>());

        let components: Vec<_> = key_path.components().collect::<Result<_, _>>().unwrap();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].kind(), ComponentKind::Struct);
        assert!(!components[0].header.end_of_reference_prefix());

        seen.push((name.to_string(), components[0].stored_offset(), key_path.variant()));
        true
    });

    assert!(complete);
    seen
}

/// A metadata service over opaque type tokens, standing in for a foreign
/// runtime. Field names are synthesized per call.
struct Catalog;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Ty {
    Record,
    Widget,
    Int,
    Closure,
}

const RECORD_FIELDS: [(Ty, usize, bool); 3] = [
    (Ty::Int, 0, true),
    (Ty::Closure, 8, true),
    (Ty::Int, 0x0200_0000, false),
];

impl TypeIntrospect for Catalog {
    type Type = Ty;

    fn is_reference_type(&self, ty: Ty) -> bool {
        ty == Ty::Widget
    }

    fn raw_metadata_kind(&self, ty: Ty) -> usize {
        match ty {
            Ty::Record | Ty::Int => 0x200,
            Ty::Widget => 0,
            // Not a code any runtime reports.
            Ty::Closure => 0x7777,
        }
    }

    fn recursive_field_count(&self, ty: Ty) -> usize {
        match ty {
            Ty::Record => RECORD_FIELDS.len(),
            Ty::Widget => 1,
            _ => 0,
        }
    }

    fn field_at<'n>(&self, ty: Ty, index: usize, names: &'n Bump) -> FieldRecord<'n, Ty> {
        let (field_ty, _, is_var) = match ty {
            Ty::Record => RECORD_FIELDS[index],
            _ => (Ty::Int, 0, true),
        };
        FieldRecord {
            name: bumpalo::format!(in names, "field{}", index).into_bump_str(),
            ty: field_ty,
            is_var,
            is_strong: true,
        }
    }

    fn field_offset(&self, ty: Ty, index: usize) -> usize {
        match ty {
            Ty::Record => RECORD_FIELDS[index].1,
            _ => 16,
        }
    }
}

#[test]
fn foreign_service_unknown_kinds_decode_to_unknown() {
    let mut kinds = Vec::new();
    assert!(visit_fields(&Catalog, Ty::Record, EachFieldOptions::empty(), |field| {
        kinds.push((field.name.to_string(), field.kind));
        true
    }));
    assert_eq!(
        kinds,
        [
            ("field0".to_string(), MetadataKind::Struct),
            ("field1".to_string(), MetadataKind::Unknown),
            ("field2".to_string(), MetadataKind::Struct),
        ]
    );
}

#[test]
fn foreign_service_large_offsets_go_out_of_line() {
    init_test_logging();
    let mut key_paths = Vec::new();
    assert!(compile_field_key_paths(&Catalog, Ty::Record, EachFieldOptions::IGNORE_UNKNOWN, |name, key_path| {
        key_paths.push((name.to_string(), key_path));
        true
    }));
    let names: Vec<_> = key_paths.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["field0", "field2"]);

    let far = &key_paths[1].1;
    assert_eq!(far.variant(), KeyPathVariant::ReadOnly);
    assert_eq!(far.buffer().capacity(), KeyPathBuffer::HEADER_SIZE + 8);
    assert_eq!(far.stored_offset(), Some(0x0200_0000));
    let component = far.components().next().unwrap().unwrap();
    assert_eq!(
        component.header.stored_offset_payload(),
        ComponentHeader::OUT_OF_LINE_OFFSET_PAYLOAD
    );
    assert!(!component.header.is_stored_mutable());
}

#[test]
fn foreign_service_gating() {
    let mut calls = 0;
    assert!(!compile_field_key_paths(&Catalog, Ty::Widget, EachFieldOptions::empty(), |_, _| {
        calls += 1;
        true
    }));
    assert_eq!(calls, 0);
    assert!(compile_field_key_paths(&Catalog, Ty::Widget, EachFieldOptions::CLASS_TYPE, |_, key_path| {
        calls += 1;
        key_path.stored_offset() == Some(16)
    }));
    assert_eq!(calls, 1);
}

#[test]
fn cloned_components_rebuild_the_same_buffer() {
    let mut original = None;
    compile_field_key_paths(&Catalog, Ty::Record, EachFieldOptions::IGNORE_UNKNOWN, |_, key_path| {
        original = Some(key_path);
        true
    });
    let original = original.unwrap();
    let source = original.buffer();

    let copy = KeyPathBuffer::create(source.capacity(), |builder| {
        builder.push_header(source.header());
        for component in source.components() {
            component.unwrap().clone_into(builder, false);
        }
    });
    assert_eq!(copy.as_bytes(), source.as_bytes());
    assert_eq!(copy.header().size(), 8);
}

#[test]
fn compilation_runs_on_many_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(|| {
                let mut count = 0;
                compile_field_key_paths_of::<MyStruct, _>(EachFieldOptions::empty(), |_, _| {
                    count += 1;
                    true
                });
                count
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 4);
    }
}
