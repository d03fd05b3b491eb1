//! SBE Intermediate Representation
//!
//! This crate contains the token model consumed by the flyweight generator:
//! a flat, depth-first sequence of tagged nodes describing message and type
//! structure. It provides pure data structures plus the span helpers needed
//! to walk them, without any code generation logic.

pub mod error;
pub mod ir;
pub mod spans;
pub mod types;

// Re-export commonly used types at the crate root
pub use error::{IrError, TokenError};
pub use ir::IntermediateRepresentation;
pub use spans::{element_end, find_end, strip_outer, validate_balanced};
pub use types::*;
