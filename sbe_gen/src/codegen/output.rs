/* Output managers: where rendered units end up */

use crate::codegen::error::{GeneratorError, GeneratorResult};
use crate::codegen::helpers::{file_stem, indent, module_name};
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Sink for generated units. Each call receives one complete unit; a unit
/// that failed to render is never handed over.
pub trait OutputManager {
  fn create_output(&mut self, name: &str, source: &str) -> GeneratorResult<()>;
}

/// Writes every unit to `<dir>/<snake_name>.rs`.
#[derive(Debug, Clone)]
pub struct DirectoryOutputManager {
  dir: PathBuf,
}

impl DirectoryOutputManager {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  pub fn path_for(&self, name: &str) -> PathBuf {
    self.dir.join(format!("{}.rs", file_stem(name)))
  }
}

impl OutputManager for DirectoryOutputManager {
  fn create_output(&mut self, name: &str, source: &str) -> GeneratorResult<()> {
    let io_error = |source| GeneratorError::Io { name: name.to_string(), source };

    fs::create_dir_all(&self.dir).map_err(io_error)?;
    fs::write(self.path_for(name), source).map_err(io_error)
  }
}

/// Keeps units in memory, in creation order.
#[derive(Debug, Default, Clone)]
pub struct InMemoryOutputManager {
  units: IndexMap<String, String>,
}

impl InMemoryOutputManager {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.units.get(name).map(String::as_str)
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.units.keys().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.units.len()
  }

  pub fn is_empty(&self) -> bool {
    self.units.is_empty()
  }

  pub fn into_units(self) -> IndexMap<String, String> {
    self.units
  }
}

impl OutputManager for InMemoryOutputManager {
  fn create_output(&mut self, name: &str, source: &str) -> GeneratorResult<()> {
    self.units.insert(name.to_string(), source.to_string());
    Ok(())
  }
}

/// `mod.rs` declaring and re-exporting every unit.
pub fn render_module_index<'u>(names: impl IntoIterator<Item = &'u str>) -> String {
  let mut out = String::from("//! Generated module index. Do not edit.\n\n");
  let modules: Vec<String> = names.into_iter().map(module_name).collect();

  for module in &modules {
    out.push_str(&format!("pub mod {};\n", module));
  }
  out.push('\n');
  for module in &modules {
    out.push_str(&format!("pub use {}::*;\n", module));
  }
  out
}

/// All units in a single source, each as an inline module, for `include!`
/// from a build script output. Inner attributes and `//!` docs are dropped
/// since they are not allowed mid-file.
pub fn render_bundle<'u>(units: impl IntoIterator<Item = (&'u str, &'u str)>) -> String {
  let mut out = String::new();

  for (name, source) in units {
    let module = module_name(name);
    let body: String = source
      .lines()
      .filter(|line| !line.starts_with("//!") && !line.starts_with("#!["))
      .map(|line| format!("{}\n", line))
      .collect();

    out.push_str(&format!("#[allow(clippy::all, unused_parens, unused_imports, dead_code)]\npub mod {} {{\n", module));
    out.push_str(&indent(body.trim_matches('\n'), 1));
    out.push_str("\n}\n\npub use ");
    out.push_str(&module);
    out.push_str("::*;\n\n");
  }

  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_in_memory_keeps_creation_order() {
    let mut out = InMemoryOutputManager::new();
    out.create_output("MessageHeader", "a").unwrap();
    out.create_output("Car", "b").unwrap();

    assert_eq!(out.names().collect::<Vec<_>>(), vec!["MessageHeader", "Car"]);
    assert_eq!(out.get("Car"), Some("b"));
    assert_eq!(out.len(), 2);

    let units = out.into_units();
    assert_eq!(units.get_index(0), Some((&"MessageHeader".to_string(), &"a".to_string())));
    assert_eq!(units["Car"], "b");
  }

  #[test]
  fn test_directory_paths_use_snake_case_stems() {
    let out = DirectoryOutputManager::new("generated/flyweights");
    assert_eq!(out.dir(), Path::new("generated/flyweights"));
    assert_eq!(out.path_for("OptionalExtras"), Path::new("generated/flyweights/optional_extras.rs"));
  }

  #[test]
  fn test_module_index_lists_every_unit() {
    let index = render_module_index(["MessageHeader", "BooleanType"]);
    assert!(index.contains("pub mod message_header;\n"));
    assert!(index.contains("pub mod boolean_type;\n"));
    assert!(index.contains("pub use boolean_type::*;\n"));
  }

  #[test]
  fn test_bundle_inlines_units_without_inner_attributes() {
    let bundle = render_bundle([("Car", "//! doc\n#![allow(dead_code)]\nuse super::*;\n\npub struct Car;\n")]);

    assert!(bundle.contains("pub mod car {\n    use super::*;\n\n    pub struct Car;\n}\n"));
    assert!(bundle.contains("pub use car::*;"));
    assert!(!bundle.contains("//! doc"));
    assert!(!bundle.contains("#![allow"));
  }
}
