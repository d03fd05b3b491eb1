/* Bit-set generation: BEGIN_SET, CHOICE*, END_SET */

use crate::codegen::composite::{render_fixed_flyweight, Members};
use crate::codegen::error::{GeneratorError, GeneratorResult};
use crate::codegen::helpers::{byte_order_expr, compound_name, primitive_to_rust_type, property_name};
use crate::codegen::literal::raw_const_value;
use sbe_ir::{strip_outer, Encoding, Signal, Token};

pub fn generate_set(name: &str, tokens: &[Token]) -> GeneratorResult<String> {
  let begin = tokens.first().ok_or_else(|| GeneratorError::EmptyTokenList { context: name.to_string() })?;
  let encoding = begin.encoding()?;

  /* Bits are tested on the raw unsigned word */
  if !encoding.primitive_type.is_unsigned() {
    return Err(GeneratorError::UnsupportedEncoding {
      name: begin.name.clone(),
      primitive: encoding.primitive_type,
      usage: "bit-set",
    });
  }

  let mut members = Members::with_methods(generate_raw_access(encoding));

  for token in strip_outer(tokens)? {
    if token.signal != Signal::Choice {
      return Err(GeneratorError::UnexpectedSignal {
        signal: token.signal,
        name: token.name.clone(),
        context: format!("set '{}'", begin.name),
      });
    }
    members.methods.push_str(&generate_choice(token, encoding)?);
  }

  let encoded_length = match begin.size {
    0 => encoding.primitive_type.size(),
    size => size,
  };
  Ok(render_fixed_flyweight(name, encoded_length, &members))
}

fn generate_raw_access(encoding: &Encoding) -> String {
  let rust_type = primitive_to_rust_type(encoding.primitive_type);
  let order = byte_order_expr(encoding.byte_order);

  format!(
    "
    pub fn raw(&self) -> CodecResult<{rust_type}> {{
        codec::get::<{rust_type}>(self.buffer, self.offset, {order})
    }}

    pub fn clear(&mut self) -> CodecResult<&mut Self> {{
        codec::put::<{rust_type}>(self.buffer, self.offset, 0, {order})?;
        Ok(self)
    }}
"
  )
}

/// Test and set accessors for one CHOICE; its const value is the bit index.
pub fn generate_choice(token: &Token, encoding: &Encoding) -> GeneratorResult<String> {
  let value = raw_const_value(token)?;
  let width = encoding.primitive_type.size() * 8;
  let bit = value.as_u64().ok_or_else(|| GeneratorError::InvalidConstValue {
    name: token.name.clone(),
    primitive: encoding.primitive_type,
    value: value.to_string(),
  })?;

  if bit >= width as u64 {
    return Err(GeneratorError::ChoiceBitOutOfRange {
      name: token.name.clone(),
      bit,
      width,
    });
  }

  let rust_type = primitive_to_rust_type(encoding.primitive_type);
  let order = byte_order_expr(encoding.byte_order);

  Ok(format!(
    "
    pub fn {getter}(&self) -> CodecResult<bool> {{
        codec::get_choice::<{rust_type}>(self.buffer, self.offset, {bit}, {order})
    }}

    pub fn {setter}(&mut self, value: bool) -> CodecResult<&mut Self> {{
        codec::put_choice::<{rust_type}>(self.buffer, self.offset, {bit}, value, {order})?;
        Ok(self)
    }}
",
    getter = property_name(&token.name),
    setter = compound_name("set_", &token.name, ""),
  ))
}
