//! Module defining the layout and accessors for the 10-byte page header shared
//! by every page variant.
//!
//! # Page Header Layout
//!
//! | Field         | Type | Offset | Description |
//! |---------------|------|--------|-------------|
//! | `page_size`   | u8   | 0      | [`crate::page_size::PageSize`] discriminant. |
//! | `page_type`   | u8   | 1      | [`crate::page_type::PageType`] discriminant. |
//! | `next_offset` | u64  | 2      | File offset of the next page in this page's chain, or 0. |
//!
//! The remaining bytes (`[10..page_size)`) are the type-specific body and are
//! not interpreted by this module.

use crate::errors::header_error::HeaderError;
use binary_helpers::le::{read_le, write_le};
use paste::paste;

/// Size of the header in bytes.
pub const HEADER_SIZE: usize = 10;

/// Immutable view into the header of a page.
#[derive(Debug)]
pub struct HeaderRef<'a> {
    bytes: &'a [u8; HEADER_SIZE],
}

impl<'a> HeaderRef<'a> {
    /// Creates a new `HeaderRef` from a slice, failing if its length is not exactly `HEADER_SIZE`.
    pub fn new(bytes: &'a [u8]) -> Result<Self, HeaderError> {
        if bytes.len() != HEADER_SIZE {
            return Err(HeaderError::HeaderSliceSizeMismatch {
                actual: bytes.len(),
                expected: HEADER_SIZE,
            });
        }
        Ok(HeaderRef {
            bytes: bytes.try_into().expect("length checked above"),
        })
    }
}

/// Mutable view into the header of a page.
#[derive(Debug)]
pub struct HeaderMut<'a> {
    bytes: &'a mut [u8; HEADER_SIZE],
}

impl<'a> HeaderMut<'a> {
    /// Creates a new `HeaderMut` from a slice, failing if its length is not exactly `HEADER_SIZE`.
    pub fn new(bytes: &'a mut [u8]) -> Result<Self, HeaderError> {
        if bytes.len() != HEADER_SIZE {
            return Err(HeaderError::HeaderSliceSizeMismatch {
                actual: bytes.len(),
                expected: HEADER_SIZE,
            });
        }
        Ok(HeaderMut {
            bytes: bytes.try_into().expect("length checked above"),
        })
    }
}

/// Defines header field constants and getter/setter methods.
///
/// Pattern: `field_id(identifier): field_type(type) = field_offset(usize)`
macro_rules! impl_header_accessors {
    ( $( $field_name:ident : $field_type:ty = $field_offset:expr ; )* ) => {
        paste! {
            $(
                #[doc = concat!("Offset of ", stringify!($field_name), " — type ", stringify!($field_type))]
                pub const [<$field_name:upper _OFFSET>] : usize = $field_offset;

                impl<'a> HeaderRef<'a> {
                    #[doc = concat!("Getter for field `", stringify!($field_name), "`.")]
                    pub fn [<get_ $field_name>](&self) -> Result<$field_type, HeaderError> {
                        Ok(read_le::<$field_type>(self.bytes, $field_offset)?)
                    }
                }

                impl<'a> HeaderMut<'a> {
                    #[doc = concat!("Setter for field `", stringify!($field_name), "`.")]
                    pub fn [<set_ $field_name>](&mut self, val: $field_type) -> Result<(), HeaderError> {
                        write_le::<$field_type>(self.bytes, $field_offset, val)?;
                        Ok(())
                    }
                }
            )*
        }
    };
}

impl_header_accessors! {
    page_size_byte : u8 = 0;
    page_type_byte : u8 = 1;
    next_offset : u64 = 2;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trip() {
        let mut bytes = [0u8; HEADER_SIZE];
        {
            let mut header = HeaderMut::new(&mut bytes).unwrap();
            header.set_page_size_byte(1).unwrap();
            header.set_page_type_byte(2).unwrap();
            header.set_next_offset(123_456_789).unwrap();
        }

        let header = HeaderRef::new(&bytes).unwrap();
        assert_eq!(header.get_page_size_byte().unwrap(), 1);
        assert_eq!(header.get_page_type_byte().unwrap(), 2);
        assert_eq!(header.get_next_offset().unwrap(), 123_456_789);
    }

    #[test]
    fn rejects_wrong_length() {
        let bytes = [0u8; 4];
        assert!(matches!(
            HeaderRef::new(&bytes),
            Err(HeaderError::HeaderSliceSizeMismatch {
                actual: 4,
                expected: HEADER_SIZE
            })
        ));
    }

    #[test]
    fn zero_next_offset_means_no_next_page() {
        let bytes = [0u8; HEADER_SIZE];
        let header = HeaderRef::new(&bytes).unwrap();
        assert_eq!(header.get_next_offset().unwrap(), 0);
    }
}
