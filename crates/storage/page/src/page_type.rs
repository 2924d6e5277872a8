use std::convert::TryFrom;

/// Discriminant stored in byte `[1]` of every page header.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    /// Reserved; never written, readers must reject it.
    Unknown = 0,
    /// A directory page listing collection-header pages.
    Master = 1,
    /// The root page of a collection: carries the name and the first slot array.
    CollectionHeader = 2,
    /// A continuation node in a collection's document-reference chain.
    CollectionBody = 3,
    /// Reserved for a future secondary index; readers must reject it.
    Index = 4,
}

impl PageType {
    /// Whether this type is accepted by [`crate::page::Page::resolve`]. `Unknown` and `Index`
    /// are reserved and always rejected.
    pub fn is_supported(self) -> bool {
        !matches!(self, PageType::Unknown | PageType::Index)
    }
}

impl From<PageType> for u8 {
    fn from(p: PageType) -> Self {
        p as u8
    }
}

impl TryFrom<u8> for PageType {
    type Error = ();

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(PageType::Unknown),
            1 => Ok(PageType::Master),
            2 => Ok(PageType::CollectionHeader),
            3 => Ok(PageType::CollectionBody),
            4 => Ok(PageType::Index),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_from_u8() {
        assert_eq!(u8::from(PageType::Master), 1);
        assert_eq!(u8::from(PageType::CollectionHeader), 2);
        assert_eq!(u8::from(PageType::CollectionBody), 3);

        assert_eq!(PageType::try_from(1).unwrap(), PageType::Master);
        assert_eq!(PageType::try_from(2).unwrap(), PageType::CollectionHeader);
        assert_eq!(PageType::try_from(3).unwrap(), PageType::CollectionBody);
        assert!(PageType::try_from(99).is_err());
    }

    #[test]
    fn unknown_and_index_are_unsupported() {
        assert!(!PageType::Unknown.is_supported());
        assert!(!PageType::Index.is_supported());
        assert!(PageType::Master.is_supported());
        assert!(PageType::CollectionHeader.is_supported());
        assert!(PageType::CollectionBody.is_supported());
    }
}
