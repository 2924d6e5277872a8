//! `OwnedDocument`: the reference [`Document`] implementation shipped so the
//! engine is runnable end to end without a caller bringing their own codec.
//!
//! Layout (the body following the 4-byte total-length prefix every document
//! carries): a sequence of `(key_len:u8, key:UTF-8, type_tag:u8, value)`
//! entries, stored sorted by key for determinism.

use crate::document::Document;
use crate::errors::DocCodecError;
use crate::field_value::FieldValue;
use binary_helpers::le::{read_le, write_le};
use binary_helpers::string::{read_len_prefixed_string, write_len_prefixed_string, MAX_STRING_LEN};
use std::collections::BTreeMap;

/// An owned, in-memory document: a sorted map from field name to [`FieldValue`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OwnedDocument {
    fields: BTreeMap<String, FieldValue>,
}

impl OwnedDocument {
    /// An empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, for constructing documents inline.
    pub fn with(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Convenience builder for a boolean field.
    pub fn with_bool(self, key: impl Into<String>, value: bool) -> Self {
        self.with(key, FieldValue::Bool(value))
    }

    /// Reads the value stored at `key`, if any.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }
}

impl Document for OwnedDocument {
    type Error = DocCodecError;

    fn encode(&self) -> Result<Vec<u8>, DocCodecError> {
        let mut body = Vec::new();
        for (key, value) in &self.fields {
            let key_bytes = key.as_bytes();
            if key_bytes.len() > MAX_STRING_LEN {
                return Err(DocCodecError::KeyTooLong(key_bytes.len()));
            }

            let mut key_entry = vec![0u8; 1 + key_bytes.len()];
            write_len_prefixed_string(&mut key_entry, 0, key)?;
            body.extend_from_slice(&key_entry);
            body.extend_from_slice(&value.encode());
        }

        let total_len = 4 + body.len();
        let mut out = vec![0u8; 4];
        write_le::<u32>(&mut out, 0, total_len as u32).expect("4-byte buffer fits a u32");
        out.extend_from_slice(&body);
        Ok(out)
    }

    fn decode(bytes: &[u8]) -> Result<Self, DocCodecError> {
        let declared = read_le::<u32>(bytes, 0)? as usize;
        if declared != bytes.len() {
            return Err(DocCodecError::DeclaredLengthMismatch {
                declared,
                actual: bytes.len(),
            });
        }

        let mut fields = BTreeMap::new();
        let mut offset = 4;
        while offset < bytes.len() {
            let (key, consumed) = read_len_prefixed_string(bytes, offset)?;
            let value_start = offset + consumed;
            let (value, value_consumed) = FieldValue::decode(bytes, value_start)?;

            fields.insert(key, value);
            offset = value_start + value_consumed;
        }

        Ok(Self { fields })
    }

    fn field_bytes(&self, key: &str) -> Option<Vec<u8>> {
        self.fields.get(key).map(FieldValue::encode)
    }

    fn fields(&self) -> Vec<(String, Vec<u8>)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.encode()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_encode_decode() {
        let doc = OwnedDocument::new().with_bool("awesome", true);
        let bytes = doc.encode().unwrap();
        let decoded = OwnedDocument::decode(&bytes).unwrap();
        assert_eq!(decoded.get("awesome"), Some(&FieldValue::Bool(true)));
        assert_eq!(decoded.byte_length().unwrap(), bytes.len());
    }

    #[test]
    fn key_longer_than_255_bytes_is_rejected_at_encode_time() {
        let key = "k".repeat(256);
        let doc = OwnedDocument::new().with_bool(key, true);
        assert!(matches!(
            doc.encode(),
            Err(DocCodecError::KeyTooLong(256))
        ));
    }

    #[test]
    fn key_at_the_255_byte_limit_round_trips() {
        let key = "k".repeat(255);
        let doc = OwnedDocument::new().with_bool(key.clone(), true);
        let bytes = doc.encode().unwrap();
        let decoded = OwnedDocument::decode(&bytes).unwrap();
        assert_eq!(decoded.get(&key), Some(&FieldValue::Bool(true)));
    }

    #[test]
    fn matches_checks_every_pattern_field() {
        let candidate = OwnedDocument::new().with_bool("awesome", true).with("count", FieldValue::UInt(3));
        let pattern = OwnedDocument::new().with_bool("awesome", true);
        assert!(candidate.matches(&pattern));

        let mismatched = OwnedDocument::new().with_bool("awesome", false);
        assert!(!candidate.matches(&mismatched));
    }

    #[test]
    fn missing_key_never_matches() {
        let candidate = OwnedDocument::new().with_bool("awesome", true);
        let pattern = OwnedDocument::new().with("nope", FieldValue::Bool(true));
        assert!(!candidate.matches(&pattern));
    }

    #[test]
    fn empty_pattern_matches_everything() {
        let candidate = OwnedDocument::new().with_bool("awesome", true);
        assert!(candidate.matches(&OwnedDocument::new()));
    }

    #[test]
    fn declared_length_mismatch_is_rejected() {
        let mut bytes = OwnedDocument::new().with_bool("a", true).encode().unwrap();
        bytes[0] = 0xFF;
        assert!(matches!(
            OwnedDocument::decode(&bytes),
            Err(DocCodecError::DeclaredLengthMismatch { .. })
        ));
    }
}
