/* Inspect command - summarise an IR file */

use anyhow::Context;
use clap::ValueEnum;
use sbe_gen::partition_message_body;
use sbe_ir::{strip_outer, IntermediateRepresentation, Signal, Token};
use serde_derive::Serialize;
use std::path::Path;

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum SummaryFormat {
  Json,
  Yaml,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct IrSummary {
  pub package: String,
  pub header_size: usize,
  pub types: Vec<TypeSummary>,
  pub messages: Vec<MessageSummary>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct TypeSummary {
  pub name: String,
  pub kind: String,
  pub size: usize,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct MessageSummary {
  pub name: String,
  pub template_id: i32,
  pub block_length: usize,
  pub root_fields: usize,
  pub groups: usize,
  pub var_data: usize,
}

fn type_kind(signal: Signal) -> String {
  match signal {
    Signal::BeginEnum => "enum".to_string(),
    Signal::BeginSet => "set".to_string(),
    Signal::BeginComposite => "composite".to_string(),
    other => other.to_string(),
  }
}

/* Number of top-level tokens with `signal`; nested spans are never counted */
fn count_top_level(tokens: &[Token], signal: Signal) -> anyhow::Result<usize> {
  let mut count = 0;
  let mut index = 0;
  while index < tokens.len() {
    if tokens[index].signal == signal {
      count += 1;
    }
    index = sbe_ir::element_end(tokens, index)? + 1;
  }
  Ok(count)
}

pub fn summarize(ir: &IntermediateRepresentation) -> anyhow::Result<IrSummary> {
  let mut messages = Vec::new();
  for tokens in ir.messages() {
    let begin = tokens.first().context("empty message token list")?;
    let body = partition_message_body(strip_outer(tokens)?)?;
    messages.push(MessageSummary {
      name: begin.name.clone(),
      template_id: begin.id,
      block_length: begin.size,
      root_fields: count_top_level(body.root_fields, Signal::BeginField)?,
      groups: count_top_level(body.groups, Signal::BeginGroup)?,
      var_data: count_top_level(body.var_data, Signal::BeginVarData)?,
    });
  }

  let types = ir
    .types()
    .filter_map(|tokens| tokens.first())
    .map(|begin| TypeSummary {
      name: begin.name.clone(),
      kind: type_kind(begin.signal),
      size: begin.size,
    })
    .collect();

  Ok(IrSummary {
    package: ir.package_name().to_string(),
    header_size: ir.header().first().map_or(0, |token| token.size),
    types,
    messages,
  })
}

/* Execute the inspect command */
pub fn run(path: &Path, format: SummaryFormat) -> anyhow::Result<()> {
  let ir = IntermediateRepresentation::load(path)
    .with_context(|| format!("failed to load IR from {}", path.display()))?;
  let summary = summarize(&ir)?;

  let rendered = match format {
    SummaryFormat::Json => serde_json::to_string_pretty(&summary)?,
    SummaryFormat::Yaml => serde_yml::to_string(&summary)?,
  };
  println!("{}", rendered);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  const SAMPLE: &str = r#"
package: demo
header:
  - { signal: begin-composite, name: messageHeader, size: 4 }
  - { signal: encoding, name: blockLength, encoding: { primitive-type: uint16 } }
  - { signal: encoding, name: templateId, offset: 2, encoding: { primitive-type: uint16 } }
  - { signal: end-composite, name: messageHeader }
types:
  - - { signal: begin-set, name: flags, size: 1, encoding: { primitive-type: uint8 } }
    - { signal: end-set, name: flags }
messages:
  - - { signal: begin-message, name: order, id: 9, size: 4 }
    - { signal: begin-field, name: qty }
    - { signal: encoding, name: uint32, encoding: { primitive-type: uint32 } }
    - { signal: begin-var-data, name: note }
    - { signal: begin-composite, name: varStringEncoding }
    - { signal: encoding, name: length, encoding: { primitive-type: uint8 } }
    - { signal: encoding, name: varData, offset: 1, array-length: 0, encoding: { primitive-type: char } }
    - { signal: end-composite, name: varStringEncoding }
    - { signal: end-var-data, name: note }
    - { signal: end-message, name: order }
"#;

  #[test]
  fn test_summary_counts_partition() {
    let ir = IntermediateRepresentation::from_yaml_str(SAMPLE).unwrap();
    let summary = summarize(&ir).unwrap();

    assert_eq!(summary.package, "demo");
    assert_eq!(summary.header_size, 4);
    assert_eq!(
      summary.types,
      vec![TypeSummary {
        name: "flags".to_string(),
        kind: "set".to_string(),
        size: 1
      }]
    );
    assert_eq!(
      summary.messages,
      vec![MessageSummary {
        name: "order".to_string(),
        template_id: 9,
        block_length: 4,
        root_fields: 1,
        groups: 0,
        var_data: 1,
      }]
    );
  }
}
