//! Top-level error type for the storage engine: the five kinds named in the
//! engine's error design, aggregated from the leaf errors each lower crate
//! raises, plus a variant for whatever document codec a caller brings.

use file::errors::FileError;
use page::errors::page_error::PageError;
use std::convert::Infallible;
use thiserror::Error;

/// Errors raised by [`crate::database::Database`] and [`crate::collection::Collection`].
///
/// Parameterized by `E`, the document codec's own error type. Operations
/// that never touch a document (opening a database, walking the master
/// directory) use the default `E = Infallible`, since they can't produce an
/// `InvalidDocument`.
#[derive(Debug, Error)]
pub enum StoreError<E = Infallible>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// The database file could not be created or opened.
    #[error("database file not accessible: {0}")]
    NotAccessible(#[source] FileError),

    /// The file is shorter than expected, or its version prefix is unreadable.
    #[error("invalid file structure: {0}")]
    InvalidFileStructure(String),

    /// A page failed structural validation.
    #[error("invalid page: {0}")]
    InvalidPage(#[from] PageError),

    /// A referenced document is truncated or fails codec-level validation.
    #[error("invalid document: {0}")]
    InvalidDocument(E),

    /// A slot offset lies outside the bounds of its containing page.
    #[error("invalid document reference: slot offset {0} is out of bounds")]
    InvalidDocumentReference(usize),
}

impl<E> From<FileError> for StoreError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: FileError) -> Self {
        match err {
            FileError::NotAccessible { .. } => StoreError::NotAccessible(err),
            FileError::Io { .. } | FileError::ShortRead { .. } => {
                StoreError::InvalidFileStructure(err.to_string())
            }
        }
    }
}

/// Convenience alias. `E` defaults to `Infallible` for operations that can't
/// produce an `InvalidDocument` (everything but document-level reads).
pub type StoreResult<T, E = Infallible> = Result<T, StoreError<E>>;
