//! Engine error taxonomy
//!
//! Only structurally invalid operations are errors. A wrong answer is never
//! an error; it is reported through [`crate::verify::Verdict`].

use thiserror::Error;

/// Errors raised by tree construction and annotation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Bad generation parameter, unknown node id or out-of-range child index
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Annotation attempted on a frozen tree or on a leaf
    #[error("illegal mutation: {0}")]
    IllegalMutation(String),

    /// A snapshot whose shape does not describe a uniform alternating tree
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
