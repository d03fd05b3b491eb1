use sbe_gen::{
    partition_message_body, DirectoryOutputManager, Generator, GeneratorError, GeneratorOptions,
    InMemoryOutputManager, OutputManager, MODULE_INDEX_NAME,
};
use sbe_ir::{strip_outer, IntermediateRepresentation, Signal, Token};
use std::fs;
use std::path::Path;

const CAR_SCHEMA: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../sbe_harness/schema/car.yaml");

fn load_car() -> IntermediateRepresentation {
    let ir = IntermediateRepresentation::load(Path::new(CAR_SCHEMA)).expect("car schema loads");
    ir.validate().expect("car schema is balanced");
    ir
}

#[test]
fn test_generate_all_emits_header_types_messages_then_index() {
    let ir = load_car();
    let generator = Generator::new(&ir, GeneratorOptions::default());
    let mut out = InMemoryOutputManager::new();

    let units = generator.generate_all(&mut out).unwrap();

    let names: Vec<&str> = out.names().collect();
    assert_eq!(
        names,
        vec![
            "MessageHeader",
            "BooleanType",
            "Model",
            "BoostType",
            "OptionalExtras",
            "Booster",
            "Engine",
            "Car",
            "Heartbeat",
            MODULE_INDEX_NAME,
        ]
    );
    assert_eq!(units.len(), names.len() - 1);

    let index = out.get(MODULE_INDEX_NAME).unwrap();
    assert!(index.contains("pub mod boost_type;"));
    assert!(index.contains("pub use optional_extras::*;"));
}

#[test]
fn test_every_unit_starts_with_the_shared_prologue() {
    let ir = load_car();
    let generator = Generator::new(&ir, GeneratorOptions::default());

    for unit in generator.render_units().unwrap() {
        assert!(
            unit.source.starts_with(&format!("//! Generated flyweight for `{}` (package `baseline`).", unit.name)),
            "unexpected prologue for {}",
            unit.name
        );
        assert!(unit.source.contains("use sbe_codec::{self as codec,"));
        assert!(unit.source.contains("use super::*;"));
    }
}

#[test]
fn test_options_change_codec_path_and_package() {
    let ir = load_car();
    let options = GeneratorOptions {
        codec_crate: "crate::runtime".to_string(),
        package_override: Some("vehicles".to_string()),
        emit_module_index: false,
    };
    let generator = Generator::new(&ir, options);
    let mut out = InMemoryOutputManager::new();
    generator.generate_all(&mut out).unwrap();

    assert!(out.get(MODULE_INDEX_NAME).is_none());
    let car = out.get("Car").unwrap();
    assert!(car.contains("(package `vehicles`)"));
    assert!(car.contains("use crate::runtime::{self as codec,"));
}

#[test]
fn test_car_message_surface() {
    let ir = load_car();
    let generator = Generator::new(&ir, GeneratorOptions::default());
    let mut out = InMemoryOutputManager::new();
    generator.generate_all(&mut out).unwrap();
    let car = out.get("Car").unwrap();

    assert!(car.contains("pub const BLOCK_LENGTH: usize = 57;"));
    assert!(car.contains("pub const TEMPLATE_ID: i32 = 1;"));
    assert!(car.contains("pub fn discounted_model(&self) -> u8"));
    assert!(car.contains("ByteOrder::BigEndian"));

    /* groups, the nested group and var data of every level */
    assert!(car.contains("pub struct CarFuelFigures<'m, 'a>"));
    assert!(car.contains("pub struct CarPerformanceFigures<'m, 'a>"));
    assert!(car.contains("pub struct CarPerformanceFiguresAcceleration<'m, 'a>"));
    assert!(car.contains("pub fn put_usage_description(&mut self, src: &[u8])"));
    assert!(car.contains("pub fn get_manufacturer(&mut self, dst: &mut [u8])"));
    assert!(car.contains("pub fn model_length(&self) -> CodecResult<usize>"));
}

#[test]
fn test_directory_output_writes_one_file_per_unit() {
    let ir = load_car();
    let generator = Generator::new(&ir, GeneratorOptions::default());
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("generated");

    let mut out = DirectoryOutputManager::new(&target);
    generator.generate_all(&mut out).unwrap();

    let mut files: Vec<String> = fs::read_dir(&target)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(
        files,
        vec![
            "boolean_type.rs",
            "boost_type.rs",
            "booster.rs",
            "car.rs",
            "engine.rs",
            "heartbeat.rs",
            "message_header.rs",
            "mod.rs",
            "model.rs",
            "optional_extras.rs",
        ]
    );

    let written = fs::read_to_string(target.join("heartbeat.rs")).unwrap();
    assert_eq!(written, generator.render_message(ir.messages().nth(1).unwrap()).unwrap().source);
}

#[test]
fn test_failed_unit_leaves_output_untouched() {
    let mut ir = load_car();
    ir.add_type(vec![
        Token::new(Signal::BeginField, "stray"),
        Token::new(Signal::EndMessage, "stray"),
    ]);
    let generator = Generator::new(&ir, GeneratorOptions::default());

    struct Refuse;
    impl OutputManager for Refuse {
        fn create_output(&mut self, name: &str, _source: &str) -> sbe_gen::GeneratorResult<()> {
            panic!("unit {} emitted despite a failed render", name);
        }
    }

    let err = generator.generate_all(&mut Refuse).unwrap_err();
    assert!(matches!(err, GeneratorError::UnexpectedSignal { signal: Signal::BeginField, .. }));
}

#[test]
fn test_bundle_inlines_every_unit() {
    let ir = load_car();
    let bundle = Generator::new(&ir, GeneratorOptions::default()).generate_bundle().unwrap();

    for module in ["message_header", "boolean_type", "optional_extras", "engine", "car", "heartbeat"] {
        assert!(bundle.contains(&format!("pub mod {} {{", module)), "missing module {}", module);
        assert!(bundle.contains(&format!("pub use {}::*;", module)));
    }
    assert!(!bundle.contains("//!"));
    assert!(!bundle.contains("#!["));
}

#[test]
fn test_car_body_partition() {
    let ir = load_car();
    let car = ir.messages().next().unwrap();
    let body = partition_message_body(strip_outer(car).unwrap()).unwrap();

    let count = |tokens: &[Token], signal: Signal| tokens.iter().filter(|t| t.signal == signal).count();

    assert_eq!(body.root_fields.first().map(|t| t.name.as_str()), Some("serialNumber"));
    assert_eq!(count(body.groups, Signal::BeginGroup), 3);
    assert_eq!(body.groups.first().map(|t| t.name.as_str()), Some("fuelFigures"));
    assert_eq!(count(body.var_data, Signal::BeginVarData), 2);
    assert_eq!(body.var_data.first().map(|t| t.name.as_str()), Some("manufacturer"));
    assert!(body.root_fields.iter().all(|t| t.signal != Signal::BeginGroup && t.signal != Signal::BeginVarData));
}

#[test]
fn test_ir_survives_yaml_and_json() {
    let ir = load_car();

    let yaml = ir.to_yaml_string().unwrap();
    assert_eq!(IntermediateRepresentation::from_yaml_str(&yaml).unwrap(), ir);

    let json = ir.to_json_string().unwrap();
    let from_json = IntermediateRepresentation::from_json_str(&json).unwrap();
    assert_eq!(from_json, ir);

    /* same IR, same code */
    let a = Generator::new(&ir, GeneratorOptions::default()).render_units().unwrap();
    let b = Generator::new(&from_json, GeneratorOptions::default()).render_units().unwrap();
    assert_eq!(a, b);
}
