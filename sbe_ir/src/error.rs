use crate::types::Signal;
use std::path::PathBuf;
use thiserror::Error;

/// Precondition violations when querying a single token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token's signal never carries an encoding.
    #[error("{signal} token '{name}' does not carry an encoding")]
    NoEncoding { signal: Signal, name: String },

    /// The token's signal requires an encoding but the IR has none.
    #[error("{signal} token '{name}' is missing its encoding")]
    MissingEncoding { signal: Signal, name: String },
}

/// Structural errors in a token list or in loading an IR document.
#[derive(Debug, Error)]
pub enum IrError {
    #[error("token list is empty")]
    Empty,

    #[error("{signal} token '{name}' at index {index} is never closed")]
    Unbalanced {
        signal: Signal,
        name: String,
        index: usize,
    },

    #[error("expected {expected} at index {index} but found {found} ('{name}')")]
    MismatchedEnd {
        expected: Signal,
        found: Signal,
        name: String,
        index: usize,
    },

    #[error("{signal} token '{name}' at index {index} closes nothing")]
    UnexpectedEnd {
        signal: Signal,
        name: String,
        index: usize,
    },

    #[error("{count} token(s) follow the span closed at index {index}")]
    TrailingTokens { index: usize, count: usize },

    #[error("token at index {index} is {found}, not the start of a span")]
    NotABegin { found: Signal, index: usize },

    #[error("failed to read IR file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported IR file extension for {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("invalid YAML IR: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("invalid JSON IR: {0}")]
    Json(#[from] serde_json::Error),
}
