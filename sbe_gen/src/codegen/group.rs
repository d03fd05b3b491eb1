/* Repeating groups and variable-length data.
   Both are emitted into the owning message's unit: a group becomes a cursor
   struct borrowing the message position, var data becomes length-prefixed
   accessors on its owner. */

use crate::codegen::composite::{generate_fields, Members};
use crate::codegen::error::{GeneratorError, GeneratorResult};
use crate::codegen::helpers::{
  byte_order_expr, compound_name, is_integral, offset_expr, primitive_to_rust_type, property_name, type_name,
};
use crate::codegen::message::partition_message_body;
use sbe_ir::{find_end, strip_outer, Signal, Token};

/// How generated code reaches the state shared by an owner and its groups.
#[derive(Debug, Clone, Copy)]
pub struct Owner<'n> {
  pub type_name: &'n str,
  /* offset every position is relative to */
  pub base: &'static str,
  /* `&mut usize` expression handed to a nested group */
  pub position_ref: &'static str,
}

impl<'n> Owner<'n> {
  pub fn message(type_name: &'n str) -> Self {
    Self { type_name, base: "self.offset", position_ref: "&mut self.position" }
  }

  pub fn group(type_name: &'n str) -> Self {
    Self { type_name, base: "self.base_offset", position_ref: "&mut *self.position" }
  }
}

/// Output of group emission: accessor methods for the owner and the cursor
/// structs themselves.
#[derive(Debug, Default)]
pub struct GroupCode {
  pub methods: String,
  pub structs: String,
}

/* Dimension encodings looked up by their conventional names */
fn find_encoding<'t>(tokens: &'t [Token], name: &str, context: &str) -> GeneratorResult<&'t Token> {
  tokens
    .iter()
    .find(|token| token.signal == Signal::Encoding && token.name == name)
    .ok_or_else(|| GeneratorError::MissingToken {
      context: context.to_string(),
      name: name.to_string(),
    })
}

fn require_integral(token: &Token, usage: &'static str) -> GeneratorResult<&'static str> {
  let primitive = token.primitive_type()?;
  if !is_integral(primitive) {
    return Err(GeneratorError::UnsupportedEncoding {
      name: token.name.clone(),
      primitive,
      usage,
    });
  }
  Ok(primitive_to_rust_type(primitive))
}

/// Splits a BEGIN_X span into its leading BEGIN_COMPOSITE header and the
/// tokens that follow it.
fn split_header<'t>(span: &'t [Token], context: &str) -> GeneratorResult<(&'t Token, &'t [Token], &'t [Token])> {
  let body = strip_outer(span)?;
  match body.first() {
    Some(header) if header.signal == Signal::BeginComposite => {
      let end = find_end(body, 0)?;
      Ok((header, &body[1..end], &body[end + 1..]))
    }
    Some(token) => Err(GeneratorError::UnexpectedSignal {
      signal: token.signal,
      name: token.name.clone(),
      context: context.to_string(),
    }),
    None => Err(GeneratorError::MissingToken {
      context: context.to_string(),
      name: "dimension header".to_string(),
    }),
  }
}

/// Every group span in `groups` for `owner`, recursing into nested groups.
pub fn generate_groups(owner: Owner<'_>, groups: &[Token]) -> GeneratorResult<GroupCode> {
  let mut code = GroupCode::default();
  let mut index = 0;

  while index < groups.len() {
    let begin = &groups[index];
    if begin.signal != Signal::BeginGroup {
      return Err(GeneratorError::UnexpectedSignal {
        signal: begin.signal,
        name: begin.name.clone(),
        context: format!("groups of '{}'", owner.type_name),
      });
    }

    let end = find_end(groups, index)?;
    generate_group(owner, &groups[index..=end], &mut code)?;
    index = end + 1;
  }

  Ok(code)
}

fn generate_group(owner: Owner<'_>, span: &[Token], code: &mut GroupCode) -> GeneratorResult<()> {
  let begin = &span[0];
  let context = format!("group '{}'", begin.name);
  let group_type = format!("{}{}", owner.type_name, type_name(&begin.name));

  let (dimension, dimension_tokens, element) = split_header(span, &context)?;
  let block_length = find_encoding(dimension_tokens, "blockLength", &context)?;
  let num_in_group = find_encoding(dimension_tokens, "numInGroup", &context)?;

  let body = partition_message_body(element)?;
  let mut members = generate_fields(body.root_fields, &context)?;
  let nested = generate_groups(Owner::group(&group_type), body.groups)?;
  members.methods.push_str(&nested.methods);
  members.methods.push_str(&generate_var_data(Owner::group(&group_type), body.var_data)?);

  code.methods.push_str(&generate_group_accessors(owner, &begin.name, &group_type));
  code.structs.push_str(&render_group_struct(
    &group_type,
    begin.size,
    dimension.size,
    block_length,
    num_in_group,
    &members,
  )?);
  code.structs.push_str(&nested.structs);
  Ok(())
}

fn generate_group_accessors(owner: Owner<'_>, name: &str, group_type: &str) -> String {
  format!(
    "
    pub fn {decode}(&mut self) -> CodecResult<{group_type}<'_, 'a>> {{
        {group_type}::wrap_for_decode(self.buffer, {base}, {position})
    }}

    pub fn {encode}(&mut self, count: usize) -> CodecResult<{group_type}<'_, 'a>> {{
        {group_type}::wrap_for_encode(self.buffer, {base}, {position}, count)
    }}
",
    decode = property_name(name),
    encode = compound_name("", name, "_count"),
    base = owner.base,
    position = owner.position_ref,
  )
}

fn render_group_struct(
  group_type: &str,
  block_length: usize,
  header_size: usize,
  block_length_token: &Token,
  num_in_group_token: &Token,
  members: &Members,
) -> GeneratorResult<String> {
  let block_type = require_integral(block_length_token, "group block length")?;
  let block_order = byte_order_expr(block_length_token.encoding()?.byte_order);
  let block_at = offset_expr("header", block_length_token.offset);
  let count_type = require_integral(num_in_group_token, "group count")?;
  let count_order = byte_order_expr(num_in_group_token.encoding()?.byte_order);
  let count_at = offset_expr("header", num_in_group_token.offset);

  Ok(format!(
    "
#[derive(Debug)]
pub struct {group_type}<'m, 'a> {{
    buffer: DirectBuffer<'a>,
    base_offset: usize,
    position: &'m mut usize,
    offset: usize,
    block_length: usize,
    count: usize,
    index: usize,
{fields}}}

impl<'m, 'a> {group_type}<'m, 'a> {{
    pub const BLOCK_LENGTH: usize = {block_length};
    pub const HEADER_SIZE: usize = {header_size};

    fn wrap_for_decode(buffer: DirectBuffer<'a>, base_offset: usize, position: &'m mut usize) -> CodecResult<Self> {{
        let header = base_offset + *position;
        let block_length = codec::get::<{block_type}>(buffer, {block_at}, {block_order})? as usize;
        let count = codec::get::<{count_type}>(buffer, {count_at}, {count_order})? as usize;
        Self::wrap(buffer, base_offset, position, block_length, count)
    }}

    fn wrap_for_encode(
        buffer: DirectBuffer<'a>,
        base_offset: usize,
        position: &'m mut usize,
        count: usize,
    ) -> CodecResult<Self> {{
        let num_in_group = {count_type}::try_from(count).map_err(|_| CodecError::LengthOutOfRange {{
            length: count,
            max: {count_type}::MAX as usize,
        }})?;
        codec::check_position(*position + Self::HEADER_SIZE, base_offset, buffer.capacity())?;

        let header = base_offset + *position;
        codec::put::<{block_type}>(buffer, {block_at}, Self::BLOCK_LENGTH as {block_type}, {block_order})?;
        codec::put::<{count_type}>(buffer, {count_at}, num_in_group, {count_order})?;
        Self::wrap(buffer, base_offset, position, Self::BLOCK_LENGTH, count)
    }}

    fn wrap(
        buffer: DirectBuffer<'a>,
        base_offset: usize,
        position: &'m mut usize,
        block_length: usize,
        count: usize,
    ) -> CodecResult<Self> {{
        let next = *position + Self::HEADER_SIZE;
        codec::check_position(next, base_offset, buffer.capacity())?;
        *position = next;

        Ok(Self {{
            buffer,
            base_offset,
            position,
            offset: base_offset + next,
            block_length,
            count,
            index: 0,
{inits}        }})
    }}

    pub fn count(&self) -> usize {{
        self.count
    }}

    pub fn block_length(&self) -> usize {{
        self.block_length
    }}

    pub fn index(&self) -> usize {{
        self.index
    }}

    pub fn has_next(&self) -> bool {{
        self.index < self.count
    }}

    pub fn position(&self) -> usize {{
        *self.position
    }}

    pub fn set_position(&mut self, position: usize) -> CodecResult<()> {{
        codec::check_position(position, self.base_offset, self.buffer.capacity())?;
        *self.position = position;
        Ok(())
    }}

    /// Moves to the next element: its block starts at the current position.
    pub fn next(&mut self) -> CodecResult<&mut Self> {{
        if self.index >= self.count {{
            return Err(CodecError::IndexOutOfRange {{
                index: self.index,
                length: self.count,
            }});
        }}

        let element = *self.position;
        self.set_position(element + self.block_length)?;
        self.offset = self.base_offset + element;
        self.index += 1;
        Ok(self)
    }}
{methods}}}
",
    fields = members.fields,
    inits = members.inits,
    methods = members.methods,
  ))
}

/// Length-prefixed accessors for every var-data span in `var_data`.
pub fn generate_var_data(owner: Owner<'_>, var_data: &[Token]) -> GeneratorResult<String> {
  let mut methods = String::new();
  let mut index = 0;

  while index < var_data.len() {
    let begin = &var_data[index];
    if begin.signal != Signal::BeginVarData {
      return Err(GeneratorError::UnexpectedSignal {
        signal: begin.signal,
        name: begin.name.clone(),
        context: format!("var data of '{}'", owner.type_name),
      });
    }

    let end = find_end(var_data, index)?;
    methods.push_str(&generate_var_data_accessors(owner, &var_data[index..=end])?);
    index = end + 1;
  }

  Ok(methods)
}

fn generate_var_data_accessors(owner: Owner<'_>, span: &[Token]) -> GeneratorResult<String> {
  let begin = &span[0];
  let context = format!("var data '{}'", begin.name);
  let (_, header_tokens, rest) = split_header(span, &context)?;
  if let Some(token) = rest.first() {
    return Err(GeneratorError::UnexpectedSignal {
      signal: token.signal,
      name: token.name.clone(),
      context,
    });
  }

  let length = find_encoding(header_tokens, "length", &context)?;
  let data = find_encoding(header_tokens, "varData", &context)?;

  let payload = data.primitive_type()?;
  if payload.size() != 1 {
    return Err(GeneratorError::UnsupportedEncoding {
      name: begin.name.clone(),
      primitive: payload,
      usage: "variable-length data payload",
    });
  }

  let length_type = require_integral(length, "variable-length data length")?;
  let length_order = byte_order_expr(length.encoding()?.byte_order);
  let base = owner.base;
  let length_at = offset_expr(&format!("{} + self.position()", base), length.offset);
  let prefix_at = offset_expr(&format!("{} + header", base), length.offset);

  Ok(format!(
    "
    pub fn {length_fn}(&self) -> CodecResult<usize> {{
        Ok(codec::get::<{length_type}>(self.buffer, {length_at}, {length_order})? as usize)
    }}

    /// Copies at most `dst.len()` bytes and moves past the whole value.
    pub fn {getter}(&mut self, dst: &mut [u8]) -> CodecResult<usize> {{
        let length = self.{length_fn}()?;
        let start = self.position() + {data_offset};
        self.set_position(start + length)?;

        let copied = dst.len().min(length);
        self.buffer.get_bytes({base} + start, &mut dst[..copied])?;
        Ok(copied)
    }}

    pub fn {setter}(&mut self, src: &[u8]) -> CodecResult<&mut Self> {{
        let length = {length_type}::try_from(src.len()).map_err(|_| CodecError::LengthOutOfRange {{
            length: src.len(),
            max: {length_type}::MAX as usize,
        }})?;
        let header = self.position();
        let start = header + {data_offset};
        self.set_position(start + src.len())?;

        codec::put::<{length_type}>(self.buffer, {prefix_at}, length, {length_order})?;
        self.buffer.put_bytes({base} + start, src)?;
        Ok(self)
    }}
",
    length_fn = compound_name("", &begin.name, "_length"),
    getter = compound_name("get_", &begin.name, ""),
    setter = compound_name("put_", &begin.name, ""),
    data_offset = data.offset,
  ))
}
