//! Lenient page resolution for listings.
//!
//! A missing or non-numeric page number yields the first page; any number
//! outside `1..=num_pages` yields the last page. An empty listing still has
//! one (empty) page.

use serde::Serialize;

/// A requested page of a listing with a fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    requested: Option<i64>,
    size: u32,
}

impl PageRequest {
    /// Build from the raw `page` query value.
    #[must_use]
    pub fn parse(raw: Option<&str>, size: u32) -> Self {
        Self {
            requested: raw.and_then(|s| s.trim().parse::<i64>().ok()),
            size: size.max(1),
        }
    }

    /// The first page.
    #[must_use]
    pub fn first(size: u32) -> Self {
        Self::parse(None, size)
    }

    /// Page size.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Resolve against the total row count.
    #[must_use]
    pub fn resolve(&self, count: u64) -> PageWindow {
        let size = u64::from(self.size);
        let num_pages = count.div_ceil(size).max(1);
        let number = match self.requested {
            None => 1,
            Some(n) if n >= 1 && (n as u64) <= num_pages => n as u64,
            Some(_) => num_pages,
        };
        PageWindow {
            number,
            num_pages,
            count,
            offset: (number - 1) * size,
            limit: size,
        }
    }
}

/// A resolved page: which rows to fetch and how to describe them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// One-based page number.
    pub number: u64,
    /// Total number of pages, at least 1.
    pub num_pages: u64,
    /// Total number of rows.
    pub count: u64,
    /// Rows to skip.
    pub offset: u64,
    /// Rows to take.
    pub limit: u64,
}

impl PageWindow {
    /// Wrap the fetched rows.
    #[must_use]
    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            has_next: self.number < self.num_pages,
            has_previous: self.number > 1,
            items,
        }
    }

    /// Slice an in-memory listing.
    #[must_use]
    pub fn slice<T: Clone>(self, all: &[T]) -> Page<T> {
        let items = all
            .iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .cloned()
            .collect();
        self.into_page(items)
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// One-based page number.
    pub number: u64,
    /// Total number of pages.
    pub num_pages: u64,
    /// Total number of rows across all pages.
    pub count: u64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_previous: bool,
    /// Rows on this page.
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Convert every row, keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            has_next: self.has_next,
            has_previous: self.has_previous,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case(None, 1 ; "missing page")]
    #[test_case(Some("abc"), 1 ; "non numeric page")]
    #[test_case(Some("2"), 2 ; "middle page")]
    #[test_case(Some("3"), 3 ; "last page")]
    #[test_case(Some("99"), 3 ; "beyond the end")]
    #[test_case(Some("0"), 3 ; "zero falls to last")]
    #[test_case(Some("-4"), 3 ; "negative falls to last")]
    fn resolves_page_number(raw: Option<&str>, expected: u64) {
        let window = PageRequest::parse(raw, 10).resolve(25);
        assert_eq!(window.number, expected);
        assert_eq!(window.num_pages, 3);
    }

    #[test]
    fn empty_listing_has_one_page() {
        let page = PageRequest::parse(Some("5"), 10)
            .resolve(0)
            .into_page::<u32>(vec![]);
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 1);
        assert!(!page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn slice_returns_requested_rows() {
        let rows: Vec<u32> = (1..=12).collect();
        let page = PageRequest::parse(Some("2"), 5).resolve(12).slice(&rows);
        assert_eq!(page.items, vec![6, 7, 8, 9, 10]);
        assert!(page.has_next);
        assert!(page.has_previous);
    }

    #[test]
    fn map_keeps_metadata() {
        let page = PageRequest::first(2).resolve(3).into_page(vec![1, 2]);
        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.items, vec![10, 20]);
        assert_eq!(mapped.num_pages, 2);
    }

    proptest! {
        #[test]
        fn number_always_within_bounds(raw in any::<i64>(), count in 0u64..10_000, size in 1u32..50) {
            let text = raw.to_string();
            let window = PageRequest::parse(Some(&text), size).resolve(count);
            prop_assert!(window.number >= 1);
            prop_assert!(window.number <= window.num_pages);
            prop_assert!(window.offset <= count);
        }
    }
}
