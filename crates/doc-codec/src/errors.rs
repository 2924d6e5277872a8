//! Error type for the reference document codec.

use thiserror::Error;

/// Errors raised while parsing or serializing an [`crate::owned_document::OwnedDocument`].
#[derive(Debug, Error)]
pub enum DocCodecError {
    #[error("binary codec error: {0}")]
    Binary(#[from] binary_helpers::bin_error::BinaryError),
    #[error("declared document length {declared} does not match buffer length {actual}")]
    DeclaredLengthMismatch { declared: usize, actual: usize },
    #[error("unknown field type tag {0}")]
    UnknownTypeTag(u8),
    #[error("field key length {0} exceeds the maximum of 255 bytes")]
    KeyTooLong(usize),
    #[error("buffer too short to decode a field starting at offset {offset}")]
    Truncated { offset: usize },
}
