/* Enum type generation: BEGIN_ENUM, VALID_VALUE*, END_ENUM */

use crate::codegen::error::{GeneratorError, GeneratorResult};
use crate::codegen::helpers::{
  byte_order_expr, compound_name, is_integral, offset_expr, primitive_to_rust_type, property_name, type_name,
};
use crate::codegen::literal::{literal_for_token, raw_const_value};
use sbe_ir::{strip_outer, Signal, Token};

pub fn generate_enum(tokens: &[Token]) -> GeneratorResult<String> {
  let begin = tokens.first().ok_or_else(|| GeneratorError::EmptyTokenList { context: "enum".to_string() })?;
  let encoding = begin.encoding()?;
  if !is_integral(encoding.primitive_type) {
    return Err(GeneratorError::UnsupportedEncoding {
      name: begin.name.clone(),
      primitive: encoding.primitive_type,
      usage: "enum",
    });
  }

  let name = type_name(&begin.name);
  let rust_type = primitive_to_rust_type(encoding.primitive_type);

  let mut variants = String::new();
  let mut value_arms = String::new();
  let mut get_arms = String::new();

  for token in strip_outer(tokens)? {
    if token.signal != Signal::ValidValue {
      return Err(GeneratorError::UnexpectedSignal {
        signal: token.signal,
        name: token.name.clone(),
        context: format!("enum '{}'", begin.name),
      });
    }

    let variant = type_name(&token.name);
    let literal = literal_for_token(token)?;
    let raw = raw_const_value(token)?;

    variants.push_str(&format!("    {},\n", variant));
    value_arms.push_str(&format!("            Self::{} => {},\n", variant, literal));
    get_arms.push_str(&format!("            {} => Ok(Self::{}),\n", raw, variant));
  }

  Ok(format!(
    "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum {name} {{
{variants}}}

impl {name} {{
    pub const fn value(self) -> {rust_type} {{
        match self {{
{value_arms}        }}
    }}

    pub fn get(value: {rust_type}) -> CodecResult<Self> {{
        match value {{
{get_arms}            _ => Err(CodecError::UnknownEnumValue {{
                enum_name: \"{name}\",
                value: i128::from(value),
            }}),
        }}
    }}
}}

impl TryFrom<{rust_type}> for {name} {{
    type Error = CodecError;

    fn try_from(value: {rust_type}) -> CodecResult<Self> {{
        Self::get(value)
    }}
}}

impl From<{name}> for {rust_type} {{
    fn from(value: {name}) -> Self {{
        value.value()
    }}
}}
"
  ))
}

/// Accessors for a field or composite member of enum type. `span` is the
/// BEGIN_ENUM..END_ENUM span; the enum itself is emitted as its own unit.
pub fn generate_enum_property(property: &str, span: &[Token], base: &str) -> GeneratorResult<String> {
  let begin = span.first().ok_or_else(|| GeneratorError::EmptyTokenList { context: property.to_string() })?;
  let encoding = begin.encoding()?;
  let enum_name = type_name(&begin.name);
  let rust_type = primitive_to_rust_type(encoding.primitive_type);
  let order = byte_order_expr(encoding.byte_order);
  let at = offset_expr(base, begin.offset);

  Ok(format!(
    "
    pub fn {getter}(&self) -> CodecResult<{enum_name}> {{
        {enum_name}::get(codec::get::<{rust_type}>(self.buffer, {at}, {order})?)
    }}

    pub fn {setter}(&mut self, value: {enum_name}) -> CodecResult<&mut Self> {{
        codec::put::<{rust_type}>(self.buffer, {at}, value.value(), {order})?;
        Ok(self)
    }}
",
    getter = property_name(property),
    setter = compound_name("set_", property, ""),
  ))
}

#[cfg(test)]
mod tests {
  use super::*;
  use sbe_ir::{Encoding, PrimitiveType, PrimitiveValue};

  fn model_enum() -> Vec<Token> {
    vec![
      Token::new(Signal::BeginEnum, "model").with_encoding(Encoding::new(PrimitiveType::Char)),
      Token::new(Signal::ValidValue, "A")
        .with_encoding(Encoding::new(PrimitiveType::Char).with_const_val(PrimitiveValue::Long(65))),
      Token::new(Signal::ValidValue, "B")
        .with_encoding(Encoding::new(PrimitiveType::Char).with_const_val(PrimitiveValue::Long(66))),
      Token::new(Signal::EndEnum, "model"),
    ]
  }

  #[test]
  fn test_enum_maps_codes_both_ways() {
    let code = generate_enum(&model_enum()).unwrap();

    assert!(code.contains("pub enum Model {"));
    assert!(code.contains("    A,\n    B,\n"));
    assert!(code.contains("pub const fn value(self) -> u8"));
    assert!(code.contains("Self::A => (65 as u8),"));
    assert!(code.contains("pub fn get(value: u8) -> CodecResult<Self>"));
    assert!(code.contains("66 => Ok(Self::B),"));
    assert!(code.contains("enum_name: \"Model\""));
    assert!(code.contains("impl TryFrom<u8> for Model"));
    assert!(code.contains("impl From<Model> for u8"));
  }

  #[test]
  fn test_valid_value_without_const_is_rejected() {
    let mut tokens = model_enum();
    tokens[2] = Token::new(Signal::ValidValue, "B").with_encoding(Encoding::new(PrimitiveType::Char));

    assert!(matches!(
      generate_enum(&tokens),
      Err(GeneratorError::MissingConstValue { signal: Signal::ValidValue, .. })
    ));
  }

  #[test]
  fn test_code_too_wide_for_encoding_is_rejected() {
    let mut tokens = model_enum();
    tokens[2] = Token::new(Signal::ValidValue, "B")
      .with_encoding(Encoding::new(PrimitiveType::Char).with_const_val(PrimitiveValue::Long(300)));

    assert!(matches!(generate_enum(&tokens), Err(GeneratorError::InvalidConstValue { .. })));
  }

  #[test]
  fn test_floating_enum_is_rejected() {
    let tokens = vec![
      Token::new(Signal::BeginEnum, "ratio").with_encoding(Encoding::new(PrimitiveType::Float)),
      Token::new(Signal::EndEnum, "ratio"),
    ];
    assert!(matches!(generate_enum(&tokens), Err(GeneratorError::UnsupportedEncoding { .. })));
  }

  #[test]
  fn test_enum_property_decodes_through_get() {
    let mut span = model_enum();
    span[0] = span[0].clone().with_offset(4);
    let code = generate_enum_property("code", &span, "self.offset").unwrap();

    assert!(code.contains("pub fn code(&self) -> CodecResult<Model>"));
    assert!(code.contains("Model::get(codec::get::<u8>(self.buffer, self.offset + 4, ByteOrder::LittleEndian)?)"));
    assert!(code.contains("pub fn set_code(&mut self, value: Model) -> CodecResult<&mut Self>"));
    assert!(code.contains("value.value()"));
  }
}
