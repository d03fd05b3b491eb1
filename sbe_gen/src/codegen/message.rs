/* Message flyweights and body partitioning */

use crate::codegen::composite::generate_fields;
use crate::codegen::error::{GeneratorError, GeneratorResult};
use crate::codegen::group::{generate_groups, generate_var_data, Owner};
use crate::codegen::helpers::type_name;
use sbe_ir::{find_end, strip_outer, Signal, Token};

/// A message (or group element) body split into its three ordered regions.
/// Each region borrows from the original token list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MessageBody<'t> {
  pub root_fields: &'t [Token],
  pub groups: &'t [Token],
  pub var_data: &'t [Token],
}

/// Root fields run until the first BEGIN_GROUP or BEGIN_VAR_DATA, groups until
/// the first BEGIN_VAR_DATA, the remainder is var data. Group spans are
/// skipped whole so var data nested inside a group stays with that group.
pub fn partition_message_body(body: &[Token]) -> GeneratorResult<MessageBody<'_>> {
  let mut index = 0;
  while index < body.len() && !matches!(body[index].signal, Signal::BeginGroup | Signal::BeginVarData) {
    index += 1;
  }
  let groups_start = index;

  while index < body.len() && body[index].signal == Signal::BeginGroup {
    index = find_end(body, index)? + 1;
  }
  let var_data_start = index;

  Ok(MessageBody {
    root_fields: &body[..groups_start],
    groups: &body[groups_start..var_data_start],
    var_data: &body[var_data_start..],
  })
}

/// Flyweight for one BEGIN_MESSAGE..END_MESSAGE token list. Returns the
/// message type name and the unit body.
pub fn generate_message(tokens: &[Token]) -> GeneratorResult<(String, String)> {
  let begin = tokens.first().ok_or_else(|| GeneratorError::EmptyTokenList { context: "message".to_string() })?;
  if begin.signal != Signal::BeginMessage {
    return Err(GeneratorError::UnexpectedSignal {
      signal: begin.signal,
      name: begin.name.clone(),
      context: "message list".to_string(),
    });
  }

  let name = type_name(&begin.name);
  let context = format!("message '{}'", begin.name);
  let body = partition_message_body(strip_outer(tokens)?)?;

  let mut members = generate_fields(body.root_fields, &context)?;
  let groups = generate_groups(Owner::message(&name), body.groups)?;
  members.methods.push_str(&groups.methods);
  members.methods.push_str(&generate_var_data(Owner::message(&name), body.var_data)?);

  let source = format!(
    "#[derive(Debug, Default, Clone)]
pub struct {name}<'a> {{
    buffer: DirectBuffer<'a>,
    offset: usize,
    position: usize,
{fields}}}

impl<'a> {name}<'a> {{
    pub const BLOCK_LENGTH: usize = {block_length};
    pub const TEMPLATE_ID: i32 = {template_id};

    /// Binds the flyweight at `offset` and moves the position past the root
    /// block. A buffer too small for the root block leaves the current binding.
    pub fn reset(&mut self, buffer: DirectBuffer<'a>, offset: usize) -> CodecResult<&mut Self> {{
        codec::check_position(Self::BLOCK_LENGTH, offset, buffer.capacity())?;
        self.buffer = buffer;
        self.offset = offset;
        self.position = Self::BLOCK_LENGTH;
        Ok(self)
    }}

    pub fn buffer(&self) -> DirectBuffer<'a> {{
        self.buffer
    }}

    pub fn offset(&self) -> usize {{
        self.offset
    }}

    pub fn position(&self) -> usize {{
        self.position
    }}

    pub fn set_position(&mut self, position: usize) -> CodecResult<()> {{
        codec::check_position(position, self.offset, self.buffer.capacity())?;
        self.position = position;
        Ok(())
    }}

    /// Bytes encoded so far, relative to the message offset.
    pub fn size(&self) -> usize {{
        self.position
    }}
{methods}}}
{group_structs}",
    block_length = begin.size,
    template_id = begin.id,
    fields = members.fields,
    methods = members.methods,
    group_structs = groups.structs,
  );

  Ok((name, source))
}
