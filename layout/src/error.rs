//! Error types for layout operations

use thiserror::Error;

/// Error type for layout operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid type code: {0:?}")]
    InvalidFormat(String),
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(#[from] serde_json::Error),
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error("unexpected end of buffer while reading {0}")]
    Exhausted(String), // field
    #[error("invalid bool: {0}")]
    InvalidBool(u8),
    #[error("shape mismatch: expected {0}, found {1}")]
    ShapeMismatch(String, String), // expected, found
    #[error("can't pack {0}: {1}")]
    Pack(String, #[source] Box<Error>), // field, cause
    #[error("unknown field: {0}")]
    UnknownField(String),
}
