use thiserror::Error;

/// Errors raised while reading or writing the 10-byte page header.
#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("header error")]
    BinaryError(#[from] binary_helpers::bin_error::BinaryError),
    #[error("header slice has length {actual}, expected {expected}")]
    HeaderSliceSizeMismatch { actual: usize, expected: usize },
}
