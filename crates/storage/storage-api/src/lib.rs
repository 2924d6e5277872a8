//! `storage-api`: the public facade over the storage engine.
//!
//! [`database::Database`] owns the file handle, bootstraps or validates the
//! on-disk format, and creates/looks up collections. [`collection::Collection`]
//! wraps a single collection's header page and exposes append / update /
//! remove / count / scan. Both are generic over `F: file::api::FileBackend`
//! so the same code runs against a real file or the in-memory backend used
//! in tests, and generic over the caller's own [`doc_codec::Document`]
//! implementation — this crate never interprets document bytes itself.

pub mod collection;
pub mod database;
pub mod errors;
pub mod options;

pub use collection::Collection;
pub use database::Database;
pub use errors::{StoreError, StoreResult};
pub use options::DatabaseOptions;
