use thiserror::Error;

/// Errors raised while reading or writing an 8-byte document slot, or a
/// 10-byte master directory entry.
#[derive(Debug, Error)]
pub enum SlotError {
    #[error("slot error")]
    BinaryError(#[from] binary_helpers::bin_error::BinaryError),
    #[error("slot region has length {actual}, expected {expected}")]
    SlotRegionSizeMismatch { actual: usize, expected: usize },
    #[error("slot index {slot_index} is out of bounds for this page")]
    InvalidSlot { slot_index: usize },
}
