use crate::error::IrError;
use crate::spans::validate_balanced;
use crate::types::Token;
use serde_derive::{Deserialize, Serialize};
use std::path::Path;

/// The complete, read-only input of a generation pass.
///
/// `header` is the token list of the fixed preamble every message starts
/// with. `types` holds one token list per enum, bit-set or composite and
/// `messages` one list per message, each delimited by its outer BEGIN/END pair.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct IntermediateRepresentation {
    pub package: String,
    pub header: Vec<Token>,
    #[serde(default)]
    pub types: Vec<Vec<Token>>,
    #[serde(default)]
    pub messages: Vec<Vec<Token>>,
}

impl IntermediateRepresentation {
    pub fn new(package: impl Into<String>, header: Vec<Token>) -> Self {
        Self {
            package: package.into(),
            header,
            types: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn package_name(&self) -> &str {
        &self.package
    }

    pub fn header(&self) -> &[Token] {
        &self.header
    }

    pub fn types(&self) -> impl Iterator<Item = &[Token]> {
        self.types.iter().map(Vec::as_slice)
    }

    pub fn messages(&self) -> impl Iterator<Item = &[Token]> {
        self.messages.iter().map(Vec::as_slice)
    }

    pub fn add_type(&mut self, tokens: Vec<Token>) {
        self.types.push(tokens);
    }

    pub fn add_message(&mut self, tokens: Vec<Token>) {
        self.messages.push(tokens);
    }

    /* Checks BEGIN/END nesting of every token list */
    pub fn validate(&self) -> Result<(), IrError> {
        validate_balanced(&self.header)?;
        for tokens in self.types.iter().chain(self.messages.iter()) {
            validate_balanced(tokens)?;
        }
        Ok(())
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, IrError> {
        Ok(serde_yml::from_str(source)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self, IrError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Loads an IR document, choosing the format from the file extension.
    pub fn load(path: &Path) -> Result<Self, IrError> {
        let source = std::fs::read_to_string(path).map_err(|source| IrError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&source),
            Some("json") => Self::from_json_str(&source),
            _ => Err(IrError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn to_yaml_string(&self) -> Result<String, IrError> {
        Ok(serde_yml::to_string(self)?)
    }

    pub fn to_json_string(&self) -> Result<String, IrError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
