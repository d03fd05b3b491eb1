use sbe_ir::{IrError, PrimitiveType, Signal, TokenError};
use thiserror::Error;

/// Errors raised while generating a single output unit. Any of them aborts
/// the unit before anything is written for it.
#[derive(Debug, Error)]
pub enum GeneratorError {
  #[error(transparent)]
  Token(#[from] TokenError),

  #[error(transparent)]
  Ir(#[from] IrError),

  #[error("{context} has no tokens")]
  EmptyTokenList { context: String },

  #[error("unexpected {signal} token '{name}' in {context}")]
  UnexpectedSignal {
    signal: Signal,
    name: String,
    context: String,
  },

  #[error("{context} is missing its '{name}' token")]
  MissingToken { context: String, name: String },

  #[error("{signal} token '{name}' requires a const value")]
  MissingConstValue { signal: Signal, name: String },

  #[error("const value {value} of '{name}' cannot be encoded as {primitive}")]
  InvalidConstValue {
    name: String,
    primitive: PrimitiveType,
    value: String,
  },

  #[error("{primitive} encoding of '{name}' is not supported for {usage}")]
  UnsupportedEncoding {
    name: String,
    primitive: PrimitiveType,
    usage: &'static str,
  },

  #[error("choice '{name}' uses bit {bit} of a {width}-bit set")]
  ChoiceBitOutOfRange { name: String, bit: u64, width: usize },

  #[error("failed to write output '{name}': {source}")]
  Io {
    name: String,
    #[source]
    source: std::io::Error,
  },
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;
