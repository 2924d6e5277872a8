//! A small, self-describing value type used by [`crate::owned_document::OwnedDocument`]
//! fields, and its little-endian wire encoding.

use crate::errors::DocCodecError;
use binary_helpers::le::read_le;

/// A field value an [`crate::owned_document::OwnedDocument`] can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Str(String),
    Bytes(Vec<u8>),
}

const TAG_NULL: u8 = 0;
const TAG_BOOL: u8 = 1;
const TAG_INT: u8 = 2;
const TAG_UINT: u8 = 3;
const TAG_STR: u8 = 4;
const TAG_BYTES: u8 = 5;

impl FieldValue {
    /// Encodes this value as `type_tag:u8` followed by its type-specific payload.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            FieldValue::Null => vec![TAG_NULL],
            FieldValue::Bool(b) => vec![TAG_BOOL, u8::from(*b)],
            FieldValue::Int(v) => {
                let mut out = vec![TAG_INT];
                out.extend_from_slice(&v.to_le_bytes());
                out
            }
            FieldValue::UInt(v) => {
                let mut out = vec![TAG_UINT];
                out.extend_from_slice(&v.to_le_bytes());
                out
            }
            FieldValue::Str(s) => {
                let mut out = vec![TAG_STR];
                out.extend_from_slice(&(s.len() as u32).to_le_bytes());
                out.extend_from_slice(s.as_bytes());
                out
            }
            FieldValue::Bytes(b) => {
                let mut out = vec![TAG_BYTES];
                out.extend_from_slice(&(b.len() as u32).to_le_bytes());
                out.extend_from_slice(b);
                out
            }
        }
    }

    /// Decodes a value starting at `offset`, returning it and the number of
    /// bytes consumed.
    pub fn decode(bytes: &[u8], offset: usize) -> Result<(FieldValue, usize), DocCodecError> {
        let tag = *bytes
            .get(offset)
            .ok_or(DocCodecError::Truncated { offset })?;

        match tag {
            TAG_NULL => Ok((FieldValue::Null, 1)),
            TAG_BOOL => {
                let byte = *bytes
                    .get(offset + 1)
                    .ok_or(DocCodecError::Truncated { offset })?;
                Ok((FieldValue::Bool(byte != 0), 2))
            }
            TAG_INT => {
                let v = read_le::<u64>(bytes, offset + 1)? as i64;
                Ok((FieldValue::Int(v), 9))
            }
            TAG_UINT => {
                let v = read_le::<u64>(bytes, offset + 1)?;
                Ok((FieldValue::UInt(v), 9))
            }
            TAG_STR => {
                let len = read_le::<u32>(bytes, offset + 1)? as usize;
                let start = offset + 5;
                let slice = bytes
                    .get(start..start + len)
                    .ok_or(DocCodecError::Truncated { offset })?;
                let s = std::str::from_utf8(slice)
                    .map_err(|e| DocCodecError::Binary(binary_helpers::bin_error::BinaryError::from(e)))?
                    .to_owned();
                Ok((FieldValue::Str(s), 5 + len))
            }
            TAG_BYTES => {
                let len = read_le::<u32>(bytes, offset + 1)? as usize;
                let start = offset + 5;
                let slice = bytes
                    .get(start..start + len)
                    .ok_or(DocCodecError::Truncated { offset })?;
                Ok((FieldValue::Bytes(slice.to_vec()), 5 + len))
            }
            other => Err(DocCodecError::UnknownTypeTag(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_round_trips() {
        let encoded = FieldValue::Bool(true).encode();
        let (decoded, consumed) = FieldValue::decode(&encoded, 0).unwrap();
        assert_eq!(decoded, FieldValue::Bool(true));
        assert_eq!(consumed, encoded.len());
    }

    #[test]
    fn str_round_trips() {
        let value = FieldValue::Str("kaas".to_owned());
        let encoded = value.encode();
        let (decoded, consumed) = FieldValue::decode(&encoded, 0).unwrap();
        assert_eq!(decoded, value);
        assert_eq!(consumed, encoded.len());
    }

    #[test]
    fn unknown_tag_errors() {
        let bytes = [200u8];
        assert!(matches!(
            FieldValue::decode(&bytes, 0),
            Err(DocCodecError::UnknownTypeTag(200))
        ));
    }
}
