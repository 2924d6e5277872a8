//! The `Document` trait: the seam between the storage engine and whatever
//! self-describing document format a caller brings.
//!
//! The storage engine never encodes or interprets document bytes beyond the
//! 4-byte length prefix every document carries; everything past that is
//! behind this trait. [`crate::owned_document::OwnedDocument`] is the one
//! concrete implementation this crate ships.

/// A self-describing, length-prefixed document that can be stored in a
/// collection and matched on field equality.
pub trait Document: Sized {
    /// The codec's own error type, surfaced by `storage-api` as a variant of
    /// its top-level error, parameterized by this type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Serializes `self` to its full on-disk representation, including the
    /// leading 4-byte total-length prefix. Fails if `self` holds a value
    /// that cannot be represented on the wire (for instance a field key
    /// longer than the codec's length-prefix can encode).
    fn encode(&self) -> Result<Vec<u8>, Self::Error>;

    /// Parses a document from `bytes`, which must be exactly the buffer
    /// previously produced by [`Document::encode`] (length prefix included).
    fn decode(bytes: &[u8]) -> Result<Self, Self::Error>;

    /// Total encoded length, including the 4-byte prefix. The default
    /// implementation just encodes and measures; implementations able to
    /// track this more cheaply may override it.
    fn byte_length(&self) -> Result<usize, Self::Error> {
        Ok(self.encode()?.len())
    }

    /// The canonical encoded bytes of the field at `key`, or `None` if the
    /// document has no such field.
    fn field_bytes(&self, key: &str) -> Option<Vec<u8>>;

    /// Every `(key, canonical encoded value bytes)` pair in this document.
    fn fields(&self) -> Vec<(String, Vec<u8>)>;

    /// Whether `self` matches `pattern`: for every field in `pattern`, `self`
    /// has a field of the same key whose encoded bytes are identical. A
    /// field present in `pattern` but missing from `self` never matches. An
    /// empty `pattern` matches every document.
    fn matches(&self, pattern: &Self) -> bool {
        pattern
            .fields()
            .iter()
            .all(|(key, value)| self.field_bytes(key).as_ref() == Some(value))
    }
}
