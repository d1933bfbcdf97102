//! Catalog paging.
//!
//! The server numbers pages from one; [`PaginationState`] numbers them from
//! zero. [`PageQuery`] is the only place the two meet.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::task::Task;
use crate::error::CoreError;

/// Page sizes offered by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PageSize {
    #[default]
    Ten,
    Twenty,
    Fifty,
    Hundred,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Ten,
        PageSize::Twenty,
        PageSize::Fifty,
        PageSize::Hundred,
    ];

    pub fn get(&self) -> u32 {
        match self {
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }
}

impl TryFrom<u32> for PageSize {
    type Error = CoreError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or(CoreError::UnsupportedPageSize(value))
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Query string for `GET tasks/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    /// One-based.
    pub page: u32,
    pub page_size: u32,
}

/// Response body of `GET tasks/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskPage {
    #[serde(default)]
    pub results: Vec<Task>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Local paging state of the catalog view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    page: u32,
    page_size: PageSize,
    total_pages: u32,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

impl PaginationState {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page: 0,
            page_size,
            total_pages: 1,
        }
    }

    /// Zero-based current page.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    /// Moves forward one page. Returns false (and does nothing) on the last page.
    pub fn advance(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page += 1;
        true
    }

    /// Moves back one page. Returns false (and does nothing) on the first page.
    pub fn retreat(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Jumps to a zero-based page without bounds checking against
    /// `total_pages`, which is only known after the next fetch.
    pub fn seek(&mut self, page: u32) {
        self.page = page;
    }

    /// Changing the page size always goes back to the first page.
    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page = 0;
    }

    /// Recomputes `total_pages` from the server's total item count.
    pub fn apply_count(&mut self, count: Option<u64>) {
        self.apply_count_for(count, self.page_size);
    }

    /// Like [`apply_count`](Self::apply_count) but with the page size the
    /// request was sent with, which may differ from the current one.
    pub fn apply_count_for(&mut self, count: Option<u64>, page_size: PageSize) {
        self.total_pages = total_pages(count, page_size);
    }

    /// Falls back to a single empty page.
    pub fn reset_total(&mut self) {
        self.total_pages = 1;
    }

    /// Wire query for the current page.
    pub fn query(&self) -> PageQuery {
        PageQuery {
            page: self.page + 1,
            page_size: self.page_size.get(),
        }
    }

    /// One-based position of the `index`-th row of the current page
    /// within the whole catalog.
    pub fn row_number(&self, index: usize) -> u64 {
        index as u64 + 1 + u64::from(self.page) * u64::from(self.page_size.get())
    }
}

/// `max(1, ceil(count / page_size))`; a missing or zero count is one page.
pub fn total_pages(count: Option<u64>, page_size: PageSize) -> u32 {
    match count {
        Some(count) if count > 0 => {
            let size = u64::from(page_size.get());
            let pages = count.div_ceil(size);
            u32::try_from(pages).unwrap_or(u32::MAX)
        }
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(Some(25), PageSize::Ten), 3);
        assert_eq!(total_pages(Some(20), PageSize::Ten), 2);
        assert_eq!(total_pages(Some(1), PageSize::Hundred), 1);
        assert_eq!(total_pages(Some(0), PageSize::Ten), 1);
        assert_eq!(total_pages(None, PageSize::Fifty), 1);
    }

    #[test]
    fn test_page_size_try_from() {
        assert_eq!(PageSize::try_from(20).unwrap(), PageSize::Twenty);
        assert!(matches!(
            PageSize::try_from(15),
            Err(CoreError::UnsupportedPageSize(15))
        ));
    }

    #[test]
    fn test_query_is_one_based() {
        let mut state = PaginationState::new(PageSize::Twenty);
        assert_eq!(state.query(), PageQuery { page: 1, page_size: 20 });

        state.apply_count(Some(100));
        state.advance();
        assert_eq!(state.query(), PageQuery { page: 2, page_size: 20 });
    }

    #[test]
    fn test_navigation_boundaries() {
        let mut state = PaginationState::default();
        assert!(!state.has_previous());
        assert!(!state.has_next());
        assert!(!state.retreat());
        assert!(!state.advance());

        state.apply_count(Some(25));
        assert!(state.advance());
        assert!(state.advance());
        assert_eq!(state.page(), 2);
        assert!(!state.has_next());
        assert!(!state.advance());
        assert!(state.retreat());
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut state = PaginationState::default();
        state.apply_count(Some(95));
        state.seek(4);

        state.set_page_size(PageSize::Fifty);
        assert_eq!(state.page(), 0);
        assert_eq!(state.page_size(), PageSize::Fifty);
    }

    #[test]
    fn test_row_number() {
        let mut state = PaginationState::default();
        assert_eq!(state.row_number(0), 1);
        state.seek(2);
        assert_eq!(state.row_number(3), 24);
    }

    #[test]
    fn test_page_size_serde() {
        assert_eq!(serde_json::to_string(&PageSize::Fifty).unwrap(), "50");
        assert_eq!(serde_json::from_str::<PageSize>("100").unwrap(), PageSize::Hundred);
        assert!(serde_json::from_str::<PageSize>("7").is_err());
    }
}
