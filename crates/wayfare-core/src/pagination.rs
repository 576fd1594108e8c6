//! # Pagination Controller
//!
//! Fixed-size pages over a filtered list.
//!
//! ## Page Math
//! ```text
//! total_pages = max(1, ceil(count / page_size))
//! page        = clamp(requested, 1, total_pages)
//! items       = list[(page − 1) × page_size .. page × page_size]
//!
//!   count = 7, page_size = 3
//!   ┌───────────┬───────────┬───────────┐
//!   │ page 1    │ page 2    │ page 3    │
//!   │ 0  1  2   │ 3  4  5   │ 6         │
//!   └───────────┴───────────┴───────────┘
//!   request page 9 → page 3, request page 0 → page 1
//! ```
//!
//! An empty list still has one (empty) page, so "page 1 of 1" is always
//! renderable.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::InventoryUnit;
use crate::validation::validate_page_size;

/// Number of pages needed for `count` items. Never zero.
///
/// ## Example
/// ```rust
/// use std::num::NonZeroUsize;
/// use wayfare_core::pagination::total_pages;
///
/// let size = NonZeroUsize::new(3).unwrap();
/// assert_eq!(total_pages(0, size), 1);
/// assert_eq!(total_pages(3, size), 1);
/// assert_eq!(total_pages(4, size), 2);
/// ```
pub fn total_pages(count: usize, page_size: NonZeroUsize) -> usize {
    count.div_ceil(page_size.get()).max(1)
}

/// Clamps a requested page into `[1, total_pages]`.
pub fn clamp_page(requested: usize, total_pages: usize) -> usize {
    requested.clamp(1, total_pages.max(1))
}

// =============================================================================
// Page
// =============================================================================

/// One page of results plus the numbers needed to render a pager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,

    /// 1-based page actually served (after clamping).
    pub page: usize,

    pub page_size: usize,
    pub total_pages: usize,

    /// Items across all pages.
    pub total_count: usize,

    /// True when the filter matched nothing at all.
    pub no_matches: bool,
}

impl<T> Page<T> {
    /// Converts the items, keeping the pager numbers.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            total_count: self.total_count,
            no_matches: self.no_matches,
        }
    }
}

/// A page of inventory units.
pub type UnitPage = Page<InventoryUnit>;

/// Slices `items` into the requested page, clamping out-of-range requests.
///
/// ## Example
/// ```rust
/// use std::num::NonZeroUsize;
/// use wayfare_core::pagination::paginate;
///
/// let items: Vec<u32> = (0..7).collect();
/// let page = paginate(&items, NonZeroUsize::new(3).unwrap(), 9);
/// assert_eq!(page.page, 3);
/// assert_eq!(page.items, vec![6]);
/// ```
pub fn paginate<T: Clone>(items: &[T], page_size: NonZeroUsize, requested: usize) -> Page<T> {
    let total_count = items.len();
    let total_pages = total_pages(total_count, page_size);
    let page = clamp_page(requested, total_pages);

    let start = ((page - 1) * page_size.get()).min(total_count);
    let end = (start + page_size.get()).min(total_count);

    Page {
        items: items[start..end].to_vec(),
        page,
        page_size: page_size.get(),
        total_pages,
        total_count,
        no_matches: total_count == 0,
    }
}

// =============================================================================
// Paginator
// =============================================================================

/// Current-page cursor with a fixed page size.
///
/// The cursor itself is unclamped; clamping happens against the live count
/// when a page is served, so shrinking results never yield an empty middle
/// page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: NonZeroUsize,
    current: usize,
}

impl Paginator {
    /// Creates a paginator on page 1.
    pub fn new(page_size: usize) -> Result<Self, ValidationError> {
        validate_page_size(page_size)?;
        let page_size = NonZeroUsize::new(page_size).ok_or_else(|| ValidationError::MustBePositive {
            field: "page size".to_string(),
        })?;
        Ok(Paginator {
            page_size,
            current: 1,
        })
    }

    #[inline]
    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    #[inline]
    pub fn current(&self) -> usize {
        self.current
    }

    /// Moves to `page`, clamped against `count` items.
    pub fn go_to(&mut self, page: usize, count: usize) -> usize {
        self.current = clamp_page(page, total_pages(count, self.page_size));
        self.current
    }

    /// Back to page 1 (any filter change).
    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Serves the current page of `items`.
    pub fn page_of<T: Clone>(&self, items: &[T]) -> Page<T> {
        paginate(items, self.page_size, self.current)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_paginate_slices_pages() {
        let items: Vec<u32> = (0..7).collect();

        let first = paginate(&items, size(3), 1);
        assert_eq!(first.items, vec![0, 1, 2]);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_count, 7);
        assert!(!first.no_matches);

        let last = paginate(&items, size(3), 3);
        assert_eq!(last.items, vec![6]);
    }

    #[test]
    fn test_paginate_clamps_out_of_range() {
        let items: Vec<u32> = (0..7).collect();
        assert_eq!(paginate(&items, size(3), 0).page, 1);
        assert_eq!(paginate(&items, size(3), 42).page, 3);
    }

    #[test]
    fn test_empty_list_has_one_empty_page() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, size(3), 5);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
        assert!(page.no_matches);
    }

    #[test]
    fn test_paginator_go_to_and_reset() {
        let mut pager = Paginator::new(3).unwrap();
        assert_eq!(pager.go_to(2, 7), 2);
        assert_eq!(pager.go_to(10, 7), 3);
        pager.reset();
        assert_eq!(pager.current(), 1);
    }

    #[test]
    fn test_paginator_clamps_when_results_shrink() {
        let mut pager = Paginator::new(3).unwrap();
        pager.go_to(3, 9);
        let page = pager.page_of(&[1, 2, 3, 4]);
        assert_eq!(page.page, 2);
        assert_eq!(page.items, vec![4]);
    }

    #[test]
    fn test_paginator_rejects_zero_page_size() {
        assert!(Paginator::new(0).is_err());
    }

    proptest! {
        #[test]
        fn prop_total_pages_law(count in 0usize..10_000, page_size in 1usize..50) {
            let expected = std::cmp::max(1, (count + page_size - 1) / page_size);
            prop_assert_eq!(total_pages(count, size(page_size)), expected);
        }

        #[test]
        fn prop_pages_partition_the_list(count in 0usize..200, page_size in 1usize..20) {
            let items: Vec<usize> = (0..count).collect();
            let pages = total_pages(count, size(page_size));
            let mut rebuilt = Vec::new();
            for page in 1..=pages {
                let served = paginate(&items, size(page_size), page);
                prop_assert!(served.items.len() <= page_size);
                rebuilt.extend(served.items);
            }
            prop_assert_eq!(rebuilt, items);
        }
    }
}
