/* Primitive property accessors: constants, scalars and fixed arrays */

use crate::codegen::error::GeneratorResult;
use crate::codegen::helpers::{
  byte_order_expr, compound_name, const_name, offset_expr, primitive_to_rust_type, property_name,
};
use crate::codegen::literal::literal_for_token;
use sbe_ir::{Encoding, Presence, Token};

/// Accessors for one ENCODING token named `name`, addressed relative to the
/// flyweight offset expression `base`.
pub fn generate_primitive_property(name: &str, token: &Token, base: &str) -> GeneratorResult<String> {
  let encoding = token.encoding()?;

  if encoding.presence == Presence::Constant {
    return generate_const_property(name, token);
  }

  match token.array_length {
    0 => Ok(String::new()),
    1 => Ok(generate_single_value_property(name, token, encoding, base)),
    _ => Ok(generate_array_property(name, token, encoding, base)),
  }
}

fn generate_const_property(name: &str, token: &Token) -> GeneratorResult<String> {
  let rust_type = primitive_to_rust_type(token.primitive_type()?);
  let literal = literal_for_token(token)?;

  Ok(format!(
    "
    pub fn {name}(&self) -> {rust_type} {{
        {literal}
    }}
",
    name = property_name(name),
  ))
}

fn generate_single_value_property(name: &str, token: &Token, encoding: &Encoding, base: &str) -> String {
  let rust_type = primitive_to_rust_type(encoding.primitive_type);
  let order = byte_order_expr(encoding.byte_order);
  let at = offset_expr(base, token.offset);

  format!(
    "
    pub fn {getter}(&self) -> CodecResult<{rust_type}> {{
        codec::get::<{rust_type}>(self.buffer, {at}, {order})
    }}

    pub fn {setter}(&mut self, value: {rust_type}) -> CodecResult<&mut Self> {{
        codec::put::<{rust_type}>(self.buffer, {at}, value, {order})?;
        Ok(self)
    }}
",
    getter = property_name(name),
    setter = compound_name("set_", name, ""),
  )
}

fn generate_array_property(name: &str, token: &Token, encoding: &Encoding, base: &str) -> String {
  let rust_type = primitive_to_rust_type(encoding.primitive_type);
  let order = byte_order_expr(encoding.byte_order);
  let length = token.array_length;
  let element_size = encoding.primitive_type.size();
  let at = offset_expr(base, token.offset);

  format!(
    "
    pub const {length_const}: usize = {length};

    pub fn {length_fn}() -> usize {{
        Self::{length_const}
    }}

    pub fn {getter}(&self, index: usize) -> CodecResult<{rust_type}> {{
        if index >= {length} {{
            return Err(CodecError::IndexOutOfRange {{ index, length: {length} }});
        }}

        codec::get::<{rust_type}>(self.buffer, {at} + index * {element_size}, {order})
    }}

    pub fn {setter}(&mut self, index: usize, value: {rust_type}) -> CodecResult<&mut Self> {{
        if index >= {length} {{
            return Err(CodecError::IndexOutOfRange {{ index, length: {length} }});
        }}

        codec::put::<{rust_type}>(self.buffer, {at} + index * {element_size}, value, {order})?;
        Ok(self)
    }}

    pub fn {get_into}(&self, dst: &mut [{rust_type}], offset: usize, length: usize) -> CodecResult<()> {{
        if offset >= {length} {{
            return Err(CodecError::OffsetOutOfRange {{ offset, length: {length} }});
        }}

        if length > {length} {{
            return Err(CodecError::LengthOutOfRange {{ length, max: {length} }});
        }}

        let available = dst.len().saturating_sub(offset);
        let dst = dst
            .get_mut(offset..offset + length)
            .ok_or(CodecError::LengthOutOfRange {{ length, max: available }})?;
        codec::get_array::<{rust_type}>(self.buffer, {at}, dst, {order})
    }}

    pub fn {put_from}(&mut self, src: &[{rust_type}], offset: usize, length: usize) -> CodecResult<&mut Self> {{
        if offset >= {length} {{
            return Err(CodecError::OffsetOutOfRange {{ offset, length: {length} }});
        }}

        if length > {length} {{
            return Err(CodecError::LengthOutOfRange {{ length, max: {length} }});
        }}

        let available = src.len().saturating_sub(offset);
        let src = src
            .get(offset..offset + length)
            .ok_or(CodecError::LengthOutOfRange {{ length, max: available }})?;
        codec::put_array::<{rust_type}>(self.buffer, {at}, src, {order})?;
        Ok(self)
    }}
",
    length_const = format!("{}_LENGTH", const_name(name)),
    length_fn = compound_name("", name, "_length"),
    getter = property_name(name),
    setter = compound_name("set_", name, ""),
    get_into = compound_name("get_", name, "_into"),
    put_from = compound_name("put_", name, "_from"),
  )
}
