/* Generates the flyweights under test from the sample schema */

use anyhow::Context;
use sbe_gen::{Generator, GeneratorOptions};
use sbe_ir::IntermediateRepresentation;
use std::env;
use std::fs;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let schema = manifest_dir.join("schema").join("car.yaml");
    println!("cargo:rerun-if-changed={}", schema.display());

    let ir = IntermediateRepresentation::load(&schema)
        .with_context(|| format!("failed to load {}", schema.display()))?;
    ir.validate()?;

    let options = GeneratorOptions {
        emit_module_index: false,
        ..GeneratorOptions::default()
    };
    let bundle = Generator::new(&ir, options).generate_bundle()?;

    let out = PathBuf::from(env::var("OUT_DIR")?).join("car.rs");
    fs::write(&out, bundle).with_context(|| format!("failed to write {}", out.display()))?;
    Ok(())
}
