//! # Pagination Model
//!
//! Page request and page result types shared by every paginated read.
//!
//! ## Pagination Contract
//! - Page numbers are 0-based, page size is >= 1
//! - `total_elements` counts DISTINCT matching entities, never join rows
//! - Ordering is stable (id ascending) so page N+1 never repeats or skips a
//!   row present in page N when the underlying data is unchanged
//! - A page number beyond the last page yields empty `items` with the true
//!   `total_elements`

use serde::{Deserialize, Serialize};

// =============================================================================
// Page Request
// =============================================================================

/// A request for one page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 0-based page number.
    pub number: u32,

    /// Number of items per page. Must be >= 1.
    pub size: u32,
}

impl PageRequest {
    /// Creates a page request.
    pub fn new(number: u32, size: u32) -> Self {
        PageRequest { number, size }
    }

    /// The first page with the given size.
    pub fn first(size: u32) -> Self {
        PageRequest { number: 0, size }
    }

    /// Row offset of this page.
    pub fn offset(&self) -> i64 {
        i64::from(self.number) * i64::from(self.size)
    }

    /// Row limit of this page.
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

// =============================================================================
// Page
// =============================================================================

/// One page of results plus the totals needed to iterate further.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items of this page, in stable order.
    pub items: Vec<T>,

    /// 0-based page number this page was requested with.
    pub number: u32,

    /// Requested page size (the last page may hold fewer items).
    pub size: u32,

    /// Total number of distinct matching entities across all pages.
    pub total_elements: u64,
}

impl<T> Page<T> {
    /// Assembles a page from its parts.
    pub fn new(items: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Page {
            items,
            number: request.number,
            size: request.size,
            total_elements,
        }
    }

    /// Total number of pages: `ceil(total_elements / size)`.
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(u64::from(self.size))
    }

    /// Whether this page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a page after this one exists.
    pub fn has_next(&self) -> bool {
        u64::from(self.number) + 1 < self.total_pages()
    }

    /// Maps the items of this page, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_limit() {
        let request = PageRequest::new(2, 10);
        assert_eq!(request.offset(), 20);
        assert_eq!(request.limit(), 10);
        assert_eq!(PageRequest::first(25).offset(), 0);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = Page::new(vec![1, 2, 3], PageRequest::first(10), 25);
        assert_eq!(page.total_pages(), 3);

        let page = Page::new(vec![1], PageRequest::first(10), 30);
        assert_eq!(page.total_pages(), 3);

        let page: Page<i32> = Page::new(vec![], PageRequest::first(10), 0);
        assert_eq!(page.total_pages(), 0);
        assert!(page.is_empty());
        assert!(!page.has_next());
    }

    #[test]
    fn test_has_next() {
        let page = Page::new(vec![0; 10], PageRequest::new(0, 10), 25);
        assert!(page.has_next());

        let page = Page::new(vec![0; 5], PageRequest::new(2, 10), 25);
        assert!(!page.has_next());
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = Page::new(vec![1, 2], PageRequest::new(1, 2), 4);
        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.items, vec![10, 20]);
        assert_eq!(mapped.number, 1);
        assert_eq!(mapped.total_elements, 4);
    }
}
