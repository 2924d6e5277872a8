//! Length-prefixed UTF-8 strings: one length byte followed by that many bytes.

use crate::bin_error::BinaryError;

/// Maximum byte length of a length-prefixed string (the prefix is one byte).
pub const MAX_STRING_LEN: usize = u8::MAX as usize;

/// Reads a 1-byte-length-prefixed UTF-8 string starting at `start_offset`.
///
/// Returns the decoded string and the number of bytes consumed (`1 + len`).
pub fn read_len_prefixed_string(
    bytes: &[u8],
    start_offset: usize,
) -> Result<(String, usize), BinaryError> {
    let len = *bytes
        .get(start_offset)
        .ok_or(BinaryError::BytesSliceSizeMismatch {
            expected: 1,
            from_offset: start_offset,
        })? as usize;

    let str_start = start_offset + 1;
    let slice =
        bytes
            .get(str_start..str_start + len)
            .ok_or(BinaryError::StringLengthMismatch {
                expected: len,
                actual: bytes.len().saturating_sub(str_start),
            })?;

    let s = std::str::from_utf8(slice)?.to_owned();
    Ok((s, 1 + len))
}

/// Writes `value` as a 1-byte-length-prefixed UTF-8 string starting at `start_offset`.
///
/// Fails if `value` is longer than [`MAX_STRING_LEN`] or does not fit in `bytes`.
pub fn write_len_prefixed_string(
    bytes: &mut [u8],
    start_offset: usize,
    value: &str,
) -> Result<(), BinaryError> {
    let encoded = value.as_bytes();
    if encoded.len() > MAX_STRING_LEN {
        return Err(BinaryError::StringLengthMismatch {
            expected: encoded.len(),
            actual: MAX_STRING_LEN,
        });
    }

    let total = 1 + encoded.len();
    let dest = bytes
        .get_mut(start_offset..start_offset + total)
        .ok_or(BinaryError::WriteErrorSliceSizeMismatch {
            src: total,
            target: bytes.len().saturating_sub(start_offset),
        })?;

    dest[0] = encoded.len() as u8;
    dest[1..].copy_from_slice(encoded);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_name() {
        let mut buf = [0u8; 16];
        write_len_prefixed_string(&mut buf, 2, "kaas").unwrap();
        let (s, consumed) = read_len_prefixed_string(&buf, 2).unwrap();
        assert_eq!(s, "kaas");
        assert_eq!(consumed, 5);
    }

    #[test]
    fn round_trips_empty_string() {
        let mut buf = [0xFFu8; 4];
        write_len_prefixed_string(&mut buf, 0, "").unwrap();
        let (s, consumed) = read_len_prefixed_string(&buf, 0).unwrap();
        assert_eq!(s, "");
        assert_eq!(consumed, 1);
    }

    #[test]
    fn read_past_end_errors() {
        let buf = [3u8, b'a', b'b'];
        let result = read_len_prefixed_string(&buf, 0);
        assert!(matches!(result, Err(BinaryError::StringLengthMismatch { .. })));
    }
}
