use std::array::TryFromSliceError;
use thiserror::Error;

/// Errors produced while reading or writing fixed-width, little-endian fields.
#[derive(Error, Debug)]
pub enum BinaryError {
    #[error("Attempt to read {expected} bytes from {from_offset}, but provided slice does not contain the expected range.")]
    BytesSliceSizeMismatch { expected: usize, from_offset: usize },
    #[error("Error converting a slice")]
    SliceConversionError(#[from] TryFromSliceError),
    #[error("Error when attempting to write data due to size mismatch: source {src} vs target {target}")]
    WriteErrorSliceSizeMismatch { src: usize, target: usize },
    #[error("string of declared length {expected} does not fit in {actual} remaining bytes")]
    StringLengthMismatch { expected: usize, actual: usize },
    #[error("string bytes are not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}
