/* Helper utilities for Rust code generation */

use heck::{ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use sbe_ir::{ByteOrder, PrimitiveType};

/* Rust reserved keywords that need to be escaped with r# */
const RUST_KEYWORDS: &[&str] = &[
  "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
  "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
  "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use", "where",
  "while", "async", "await", "dyn", "abstract", "become", "box", "do", "final", "macro",
  "override", "priv", "typeof", "unsized", "virtual", "yield", "try", "gen",
];

/* Escape Rust keywords to valid identifiers */
pub fn escape_rust_keyword(name: &str) -> String {
  /* These cannot be raw identifiers */
  if matches!(name, "self" | "Self" | "super" | "crate") {
    format!("{}_", name)
  } else if RUST_KEYWORDS.contains(&name) {
    format!("r#{}", name)
  } else {
    name.to_string()
  }
}

/* Convert primitive type to Rust type string */
pub fn primitive_to_rust_type(primitive: PrimitiveType) -> &'static str {
  match primitive {
    PrimitiveType::Char => "u8",
    PrimitiveType::Int8 => "i8",
    PrimitiveType::Int16 => "i16",
    PrimitiveType::Int32 => "i32",
    PrimitiveType::Int64 => "i64",
    PrimitiveType::Uint8 => "u8",
    PrimitiveType::Uint16 => "u16",
    PrimitiveType::Uint32 => "u32",
    PrimitiveType::Uint64 => "u64",
    PrimitiveType::Float => "f32",
    PrimitiveType::Double => "f64",
  }
}

pub fn is_integral(primitive: PrimitiveType) -> bool {
  !matches!(primitive, PrimitiveType::Float | PrimitiveType::Double)
}

/* Codec byte order expression for generated code */
pub fn byte_order_expr(order: ByteOrder) -> &'static str {
  match order {
    ByteOrder::LittleEndian => "ByteOrder::LittleEndian",
    ByteOrder::BigEndian => "ByteOrder::BigEndian",
  }
}

/* Schema identifier to Rust type name: `fuelFigures` -> `FuelFigures` */
pub fn type_name(name: &str) -> String {
  name.to_upper_camel_case()
}

/* Schema identifier to accessor name: `someNumbers` -> `some_numbers` */
pub fn property_name(name: &str) -> String {
  escape_rust_keyword(&name.to_snake_case())
}

/* Accessor name with a prefix or suffix attached; never needs escaping */
pub fn compound_name(prefix: &str, name: &str, suffix: &str) -> String {
  format!("{}{}{}", prefix, name.to_snake_case(), suffix)
}

pub fn const_name(name: &str) -> String {
  name.to_shouty_snake_case()
}

pub fn module_name(name: &str) -> String {
  escape_rust_keyword(&name.to_snake_case())
}

/* Source file stem of a module; `r#type` lives in `type.rs` */
pub fn file_stem(name: &str) -> String {
  name.to_snake_case()
}

/* `base + offset`, dropping a zero offset */
pub fn offset_expr(base: &str, offset: usize) -> String {
  if offset == 0 {
    base.to_string()
  } else {
    format!("{} + {}", base, offset)
  }
}

/* Indent every non-empty line by `level` steps of four spaces */
pub fn indent(source: &str, level: usize) -> String {
  let prefix = "    ".repeat(level);
  source
    .lines()
    .map(|line| if line.is_empty() { String::new() } else { format!("{}{}", prefix, line) })
    .collect::<Vec<_>>()
    .join("\n")
}
