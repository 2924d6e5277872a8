//! Little-endian byte codec shared by every on-disk layout in this workspace.

pub mod bin_error;
pub mod le;
pub mod string;
