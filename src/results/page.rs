use super::row::Row;

/// Conventional page size when callers have no better preference.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// One page of query results.
///
/// `last` is derived from a one-row lookahead: the paging query requests
/// `page_size + 1` rows, and a full lookahead means more pages follow.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub page_number: u64,
    pub page_size: u64,
    pub data: Vec<Row>,
    pub last: bool,
}

impl Page {
    /// Build a page from rows fetched with a one-row lookahead.
    ///
    /// The page is last iff no more than `page_size` rows came back;
    /// otherwise the lookahead row is dropped.
    #[must_use]
    pub fn from_lookahead(page_number: u64, page_size: u64, mut rows: Vec<Row>) -> Self {
        let last = rows.len() as u64 <= page_size;
        if !last {
            rows.truncate(usize::try_from(page_size).unwrap_or(usize::MAX));
        }
        Self {
            page_number,
            page_size,
            data: rows,
            last,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
