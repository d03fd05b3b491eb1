//! SBE flyweight generator.
//!
//! Turns an [`sbe_ir::IntermediateRepresentation`] into Rust source for
//! zero-copy flyweights over a byte buffer. Generated code depends only on the
//! `sbe_codec` runtime.
//!
//! ```no_run
//! use sbe_gen::{Generator, GeneratorOptions, DirectoryOutputManager};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ir = sbe_ir::IntermediateRepresentation::load("car.yaml".as_ref())?;
//! let mut out = DirectoryOutputManager::new("generated");
//! Generator::new(&ir, GeneratorOptions::default()).generate_all(&mut out)?;
//! # Ok(())
//! # }
//! ```

pub mod codegen;

pub use codegen::{
  generate_literal, partition_message_body, render_bundle, render_module_index, DirectoryOutputManager, Generator,
  GeneratorError, GeneratorOptions, GeneratorResult, InMemoryOutputManager, MessageBody, OutputManager, Unit,
  MESSAGE_HEADER_NAME, MODULE_INDEX_NAME,
};
