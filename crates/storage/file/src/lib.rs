//! The `file` crate is responsible for random-access byte storage backing a
//! single database file: read, write, append, and length queries. It knows
//! nothing about pages or documents — that interpretation lives in the
//! `page` and `storage-api` crates.

pub mod api;
pub mod disk_file_backend;
pub mod errors;
pub mod in_memory_file_backend;
