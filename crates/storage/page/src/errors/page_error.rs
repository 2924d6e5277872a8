use crate::errors::header_error::HeaderError;
use crate::errors::slot_error::SlotError;
use thiserror::Error;

/// Public-facing error type for structural page validation and access.
///
/// This is the `InvalidPage` kind named in the storage engine's error design;
/// callers further up the stack (`storage-api`) fold it into their own
/// top-level error type alongside file and document errors.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("error reading or writing the page header")]
    Header(#[from] HeaderError),
    #[error("error reading or writing a slot")]
    Slot(#[from] SlotError),
    #[error("error reading or writing the collection name")]
    Name(#[from] binary_helpers::bin_error::BinaryError),
    #[error("page buffer has length {actual}, expected {expected} for its declared size")]
    BufferSizeMismatch { actual: usize, expected: usize },
    #[error("byte 0 of the page header ({0}) is not a valid page size")]
    InvalidPageSizeByte(u8),
    #[error("byte 1 of the page header ({0}) is not a supported page type")]
    InvalidPageTypeByte(u8),
    #[error("expected a {expected:?} page but found a {actual:?} page")]
    UnexpectedPageType {
        expected: crate::page_type::PageType,
        actual: crate::page_type::PageType,
    },
    #[error("next pointer of a {0:?} page must reference a page of the same type")]
    ChainTypeMismatch(crate::page_type::PageType),
}

/// Result type returned by page-level operations.
pub type PageResult<T> = Result<T, PageError>;
