//! On-disk page layout: the 10-byte header shared by every page, the
//! directory protocol used by master pages, the slot-array protocol shared
//! by collection header/body pages, and the tagged-sum [`page::Page`] that
//! ties them together. This crate does no file I/O of its own — it only
//! knows how to interpret and produce page-sized byte buffers; `storage-api`
//! orchestrates reading and writing them through the `file` crate.

pub mod collection_body;
pub mod collection_header;
pub mod directory;
pub mod errors;
pub mod header;
pub mod master;
pub mod page;
pub mod page_ref;
pub mod page_size;
pub mod page_type;
pub mod slot_chain;
