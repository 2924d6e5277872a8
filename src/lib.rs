//! # docstore
//!
//! A single-file, embedded document store: self-describing binary documents
//! persisted into named collections inside one file per database.
//!
//! This crate re-exports the public surface assembled from the workspace's
//! internal components, organized under `/crates`:
//!
//! - `/crates/storage/binary-helpers`: little-endian integer and
//!   length-prefixed string encoding shared by every on-disk layout.
//! - `/crates/storage/file`: random-access byte storage backing a database
//!   file (disk-backed and in-memory implementations).
//! - `/crates/storage/page`: the on-disk page layout — header, master
//!   directory, and collection header/body pages.
//! - `/crates/storage/storage-api`: [`Database`] and [`Collection`], the
//!   facades most callers use directly.
//! - `/crates/doc-codec`: the [`Document`] trait and its reference
//!   implementation, [`OwnedDocument`].

pub use doc_codec::{Document, DocCodecError, FieldValue, OwnedDocument};
pub use storage_api::collection::{Collection, DocumentIter};
pub use storage_api::database::Database;
pub use storage_api::errors::{StoreError, StoreResult};
pub use storage_api::options::DatabaseOptions;
