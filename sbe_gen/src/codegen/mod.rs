pub mod choice;
pub mod composite;
pub mod enums;
pub mod error;
pub mod group;
pub mod helpers;
pub mod literal;
pub mod message;
pub mod output;
pub mod primitive;

pub use error::{GeneratorError, GeneratorResult};
pub use literal::generate_literal;
pub use message::{partition_message_body, MessageBody};
pub use output::{render_bundle, render_module_index, DirectoryOutputManager, InMemoryOutputManager, OutputManager};

use helpers::{module_name, type_name};
use rayon::prelude::*;
use sbe_ir::{IntermediateRepresentation, Signal, Token};
use tracing::{debug, info};

/// Name of the unit generated from the IR header.
pub const MESSAGE_HEADER_NAME: &str = "MessageHeader";

/// Name of the module index unit written by `generate_all`.
pub const MODULE_INDEX_NAME: &str = "mod";

pub struct GeneratorOptions {
  /* Path generated code imports the codec runtime from */
  pub codec_crate: String,
  /* Replaces the IR package name in unit headers */
  pub package_override: Option<String>,
  pub emit_module_index: bool,
}

impl Default for GeneratorOptions {
  fn default() -> Self {
    Self {
      codec_crate: "sbe_codec".to_string(),
      package_override: None,
      emit_module_index: true,
    }
  }
}

/// One rendered output: a complete source for a single type or message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
  pub name: String,
  pub source: String,
}

impl Unit {
  pub fn module(&self) -> String {
    module_name(&self.name)
  }
}

/// Walks an IR and renders one unit per message, per type, plus the header.
pub struct Generator<'ir> {
  ir: &'ir IntermediateRepresentation,
  options: GeneratorOptions,
}

impl<'ir> Generator<'ir> {
  pub fn new(ir: &'ir IntermediateRepresentation, options: GeneratorOptions) -> Self {
    Self { ir, options }
  }

  pub fn options(&self) -> &GeneratorOptions {
    &self.options
  }

  fn package(&self) -> &str {
    self.options.package_override.as_deref().unwrap_or_else(|| self.ir.package_name())
  }

  /* Prologue shared by every unit */
  fn unit_header(&self, name: &str) -> String {
    format!(
      "//! Generated flyweight for `{name}` (package `{package}`). Do not edit.
#![allow(clippy::all, unused_parens, unused_imports, dead_code)]

use {codec}::{{self as codec, ByteOrder, CodecError, CodecResult, DirectBuffer}};
use super::*;

",
      package = self.package(),
      codec = self.options.codec_crate,
    )
  }

  fn unit(&self, name: String, body: String) -> Unit {
    let mut source = self.unit_header(&name);
    source.push_str(&body);
    Unit { name, source }
  }

  pub fn render_message_header(&self) -> GeneratorResult<Unit> {
    let header = self.ir.header();
    if header.is_empty() {
      return Err(GeneratorError::EmptyTokenList { context: "message header".to_string() });
    }

    let body = composite::generate_composite(MESSAGE_HEADER_NAME, header)?;
    Ok(self.unit(MESSAGE_HEADER_NAME.to_string(), body))
  }

  /// Renders one type list, dispatching on its opening signal.
  pub fn render_type(&self, tokens: &[Token]) -> GeneratorResult<Unit> {
    let begin = tokens.first().ok_or_else(|| GeneratorError::EmptyTokenList { context: "type".to_string() })?;
    let name = type_name(&begin.name);

    let body = match begin.signal {
      Signal::BeginEnum => enums::generate_enum(tokens)?,
      Signal::BeginSet => choice::generate_set(&name, tokens)?,
      Signal::BeginComposite => composite::generate_composite(&name, tokens)?,
      Signal::BeginMessage
      | Signal::EndMessage
      | Signal::BeginField
      | Signal::Encoding
      | Signal::EndEnum
      | Signal::ValidValue
      | Signal::EndSet
      | Signal::Choice
      | Signal::EndComposite
      | Signal::BeginGroup
      | Signal::EndGroup
      | Signal::BeginVarData
      | Signal::EndVarData => {
        return Err(GeneratorError::UnexpectedSignal {
          signal: begin.signal,
          name: begin.name.clone(),
          context: "type list".to_string(),
        });
      }
    };

    Ok(self.unit(name, body))
  }

  pub fn render_message(&self, tokens: &[Token]) -> GeneratorResult<Unit> {
    let (name, body) = message::generate_message(tokens)?;
    Ok(self.unit(name, body))
  }

  /// Every unit (header, types, messages) in that order. Units only read the
  /// IR, so they are rendered in parallel.
  pub fn render_units(&self) -> GeneratorResult<Vec<Unit>> {
    let types: Vec<&[Token]> = self.ir.types().collect();
    let messages: Vec<&[Token]> = self.ir.messages().collect();

    let mut units = vec![self.render_message_header()?];
    units.extend(types.par_iter().map(|tokens| self.render_type(tokens)).collect::<GeneratorResult<Vec<_>>>()?);
    units.extend(
      messages
        .par_iter()
        .map(|tokens| self.render_message(tokens))
        .collect::<GeneratorResult<Vec<_>>>()?,
    );
    Ok(units)
  }

  pub fn generate_message_header_stub(&self, out: &mut dyn OutputManager) -> GeneratorResult<()> {
    let unit = self.render_message_header()?;
    emit(out, &unit)
  }

  pub fn generate_type_stubs(&self, out: &mut dyn OutputManager) -> GeneratorResult<()> {
    for tokens in self.ir.types() {
      let unit = self.render_type(tokens)?;
      emit(out, &unit)?;
    }
    Ok(())
  }

  pub fn generate_message_stubs(&self, out: &mut dyn OutputManager) -> GeneratorResult<()> {
    for tokens in self.ir.messages() {
      let unit = self.render_message(tokens)?;
      emit(out, &unit)?;
    }
    Ok(())
  }

  /// Renders every unit first, then hands them to `out` followed by the
  /// module index. Nothing is written when any unit fails.
  pub fn generate_all(&self, out: &mut dyn OutputManager) -> GeneratorResult<Vec<Unit>> {
    let units = self.render_units()?;
    for unit in &units {
      emit(out, unit)?;
    }

    if self.options.emit_module_index {
      out.create_output(MODULE_INDEX_NAME, &render_module_index(units.iter().map(|unit| unit.name.as_str())))?;
    }

    info!(
      package = self.package(),
      units = units.len(),
      "generated flyweights"
    );
    Ok(units)
  }

  /// Every unit concatenated into one `include!`-able source.
  pub fn generate_bundle(&self) -> GeneratorResult<String> {
    let units = self.render_units()?;
    info!(package = self.package(), units = units.len(), "generated flyweight bundle");
    Ok(render_bundle(units.iter().map(|unit| (unit.name.as_str(), unit.source.as_str()))))
  }
}

fn emit(out: &mut dyn OutputManager, unit: &Unit) -> GeneratorResult<()> {
  debug!(unit = %unit.name, bytes = unit.source.len(), "emitting unit");
  out.create_output(&unit.name, &unit.source)
}
