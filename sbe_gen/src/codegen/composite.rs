/* Composite flyweights and the shared member dispatch used by every flyweight */

use crate::codegen::enums::generate_enum_property;
use crate::codegen::error::{GeneratorError, GeneratorResult};
use crate::codegen::helpers::{offset_expr, property_name, type_name};
use crate::codegen::primitive::generate_primitive_property;
use sbe_ir::{element_end, strip_outer, Signal, Token};

/// Struct fields and impl methods accumulated for one flyweight.
#[derive(Debug, Default)]
pub struct Members {
  pub fields: String,
  /* initialisers for `fields`, used where the flyweight cannot derive Default */
  pub inits: String,
  pub methods: String,
}

impl Members {
  pub fn with_methods(methods: String) -> Self {
    Self { methods, ..Self::default() }
  }

  pub fn append(&mut self, other: Members) {
    self.fields.push_str(&other.fields);
    self.inits.push_str(&other.inits);
    self.methods.push_str(&other.methods);
  }
}

/// Members for one element named `property` whose type is described by
/// `span`: a single ENCODING token or a balanced enum/set/composite span.
pub fn generate_element(property: &str, span: &[Token], base: &str, context: &str) -> GeneratorResult<Members> {
  let first = span.first().ok_or_else(|| GeneratorError::MissingToken {
    context: context.to_string(),
    name: property.to_string(),
  })?;

  match first.signal {
    Signal::Encoding => Ok(Members::with_methods(generate_primitive_property(property, first, base)?)),
    Signal::BeginEnum => Ok(Members::with_methods(generate_enum_property(property, span, base)?)),
    Signal::BeginSet | Signal::BeginComposite => Ok(generate_nested_accessor(property, first, base)),
    Signal::BeginMessage
    | Signal::EndMessage
    | Signal::BeginField
    | Signal::EndEnum
    | Signal::ValidValue
    | Signal::EndSet
    | Signal::Choice
    | Signal::EndComposite
    | Signal::BeginGroup
    | Signal::EndGroup
    | Signal::BeginVarData
    | Signal::EndVarData => Err(GeneratorError::UnexpectedSignal {
      signal: first.signal,
      name: first.name.clone(),
      context: context.to_string(),
    }),
  }
}

/* Reused nested flyweight, rebound on every access */
fn generate_nested_accessor(property: &str, begin: &Token, base: &str) -> Members {
  let field = property_name(property);
  let nested_type = type_name(&begin.name);
  let at = offset_expr(base, begin.offset);

  Members {
    fields: format!("    {}: {}<'a>,\n", field, nested_type),
    inits: format!("            {}: {}::default(),\n", field, nested_type),
    methods: format!(
      "
    pub fn {field}(&mut self) -> &mut {nested_type}<'a> {{
        self.{field}.reset(self.buffer, {at});
        &mut self.{field}
    }}
"
    ),
  }
}

/// Members of a composite body: each ENCODING token or nested span is one
/// member, nested spans consumed as a unit.
pub fn generate_composite_members(body: &[Token], context: &str) -> GeneratorResult<Members> {
  let mut members = Members::default();
  let mut index = 0;

  while index < body.len() {
    let end = element_end(body, index)?;
    let token = &body[index];
    members.append(generate_element(&token.name, &body[index..=end], "self.offset", context)?);
    index = end + 1;
  }

  Ok(members)
}

/// Root fields of a message or group element: BEGIN_FIELD followed by its
/// type element.
pub fn generate_fields(fields: &[Token], context: &str) -> GeneratorResult<Members> {
  let mut members = Members::default();
  let mut index = 0;

  while index < fields.len() {
    let field = &fields[index];
    if field.signal != Signal::BeginField {
      return Err(GeneratorError::UnexpectedSignal {
        signal: field.signal,
        name: field.name.clone(),
        context: context.to_string(),
      });
    }

    let type_start = index + 1;
    if type_start >= fields.len() {
      return Err(GeneratorError::MissingToken {
        context: context.to_string(),
        name: field.name.clone(),
      });
    }

    let type_end = element_end(fields, type_start)?;
    members.append(generate_element(&field.name, &fields[type_start..=type_end], "self.offset", context)?);
    index = type_end + 1;
  }

  Ok(members)
}

/// A fixed-size flyweight: composite, bit-set or message header.
pub fn render_fixed_flyweight(name: &str, encoded_length: usize, members: &Members) -> String {
  format!(
    "#[derive(Debug, Default, Clone, Copy)]
pub struct {name}<'a> {{
    buffer: DirectBuffer<'a>,
    offset: usize,
{fields}}}

impl<'a> {name}<'a> {{
    pub const ENCODED_LENGTH: usize = {encoded_length};

    pub fn reset(&mut self, buffer: DirectBuffer<'a>, offset: usize) -> &mut Self {{
        self.buffer = buffer;
        self.offset = offset;
        self
    }}

    pub fn buffer(&self) -> DirectBuffer<'a> {{
        self.buffer
    }}

    pub fn offset(&self) -> usize {{
        self.offset
    }}
{methods}}}
",
    fields = members.fields,
    methods = members.methods,
  )
}

/// Flyweight for a BEGIN_COMPOSITE..END_COMPOSITE type list, named `name`.
pub fn generate_composite(name: &str, tokens: &[Token]) -> GeneratorResult<String> {
  let begin = tokens.first().ok_or_else(|| GeneratorError::EmptyTokenList { context: name.to_string() })?;
  let members = generate_composite_members(strip_outer(tokens)?, &format!("composite '{}'", begin.name))?;
  Ok(render_fixed_flyweight(name, begin.size, &members))
}

#[cfg(test)]
mod tests {
  use super::*;
  use sbe_ir::{Encoding, PrimitiveType, PrimitiveValue};

  fn engine() -> Vec<Token> {
    vec![
      Token::new(Signal::BeginComposite, "engine").with_size(7),
      Token::new(Signal::Encoding, "capacity").with_encoding(Encoding::new(PrimitiveType::Uint16)),
      Token::new(Signal::Encoding, "numCylinders")
        .with_offset(2)
        .with_encoding(Encoding::new(PrimitiveType::Uint8)),
      Token::new(Signal::Encoding, "maxRpm")
        .with_offset(3)
        .with_encoding(Encoding::constant(PrimitiveType::Uint16, PrimitiveValue::Long(9000))),
      Token::new(Signal::BeginComposite, "booster").with_offset(3).with_size(2),
      Token::new(Signal::Encoding, "horsePower").with_encoding(Encoding::new(PrimitiveType::Uint16)),
      Token::new(Signal::EndComposite, "booster"),
      Token::new(Signal::Encoding, "fuel")
        .with_offset(5)
        .with_encoding(Encoding::new(PrimitiveType::Uint16)),
      Token::new(Signal::EndComposite, "engine"),
    ]
  }

  #[test]
  fn test_composite_is_fixed_flyweight() {
    let code = generate_composite("Engine", &engine()).unwrap();

    assert!(code.contains("pub struct Engine<'a> {"));
    assert!(code.contains("pub const ENCODED_LENGTH: usize = 7;"));
    assert!(code.contains("pub fn reset(&mut self, buffer: DirectBuffer<'a>, offset: usize) -> &mut Self"));
    assert!(code.contains("pub fn num_cylinders(&self) -> CodecResult<u8>"));
    assert!(code.contains("self.offset + 2"));
    assert!(code.contains("pub fn max_rpm(&self) -> u16"));
  }

  #[test]
  fn test_nested_composite_is_reused_and_skipped_as_unit() {
    let code = generate_composite("Engine", &engine()).unwrap();

    assert!(code.contains("    booster: Booster<'a>,\n"));
    assert!(code.contains("pub fn booster(&mut self) -> &mut Booster<'a>"));
    assert!(code.contains("self.booster.reset(self.buffer, self.offset + 3);"));
    /* the nested member belongs to the nested flyweight, not this one */
    assert!(!code.contains("pub fn horse_power"));
    assert!(code.contains("pub fn fuel(&self)"));
    assert!(code.contains("self.offset + 5"));
  }

  #[test]
  fn test_field_without_type_token_is_rejected() {
    let fields = vec![Token::new(Signal::BeginField, "orphan")];
    assert!(matches!(
      generate_fields(&fields, "message 'car'"),
      Err(GeneratorError::MissingToken { .. })
    ));
  }

  #[test]
  fn test_field_type_comes_from_following_span() {
    let fields = vec![
      Token::new(Signal::BeginField, "extras").with_id(6),
      Token::new(Signal::BeginSet, "optionalExtras")
        .with_offset(12)
        .with_encoding(Encoding::new(PrimitiveType::Uint8)),
      Token::new(Signal::Choice, "sunRoof")
        .with_encoding(Encoding::new(PrimitiveType::Uint8).with_const_val(PrimitiveValue::Long(0))),
      Token::new(Signal::EndSet, "optionalExtras"),
      Token::new(Signal::BeginField, "year").with_id(2),
      Token::new(Signal::Encoding, "uint16")
        .with_offset(13)
        .with_encoding(Encoding::new(PrimitiveType::Uint16)),
    ];
    let members = generate_fields(&fields, "message 'car'").unwrap();

    assert_eq!(members.fields, "    extras: OptionalExtras<'a>,\n");
    assert!(members.methods.contains("pub fn extras(&mut self) -> &mut OptionalExtras<'a>"));
    assert!(members.methods.contains("self.extras.reset(self.buffer, self.offset + 12);"));
    assert!(members.methods.contains("pub fn year(&self) -> CodecResult<u16>"));
  }

  #[test]
  fn test_unexpected_member_signal_is_rejected() {
    let body = vec![Token::new(Signal::BeginGroup, "g").with_size(1), Token::new(Signal::EndGroup, "g")];
    assert!(matches!(
      generate_composite_members(&body, "composite 'x'"),
      Err(GeneratorError::UnexpectedSignal { signal: Signal::BeginGroup, .. })
    ));
  }
}
