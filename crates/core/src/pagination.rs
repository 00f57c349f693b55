//! Pagination math shared by every list endpoint.
//!
//! Inputs are never rejected: out-of-range pages and page sizes are clamped,
//! so the helpers here are total functions.

use serde::Serialize;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum number of items per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A clamped window into a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Rows to skip (`(page - 1) * take`).
    pub skip: i64,
    /// Rows to fetch.
    pub take: i64,
    /// The clamped page number (1-based).
    pub page: i64,
}

/// Compute a [`PageWindow`] from raw `page` / `page_size` inputs.
///
/// `page` is clamped to >= 1 and `page_size` to `[1, MAX_PAGE_SIZE]`.
pub fn paginate(page: i64, page_size: i64) -> PageWindow {
    paginate_with_max(page, page_size, MAX_PAGE_SIZE)
}

/// Like [`paginate`] but with a caller-supplied upper bound on the page size.
pub fn paginate_with_max(page: i64, page_size: i64, max_page_size: i64) -> PageWindow {
    let page = page.max(1);
    let take = page_size.clamp(1, max_page_size.max(1));
    PageWindow {
        skip: (page - 1) * take,
        take,
        page,
    }
}

/// Number of pages needed to cover `total` items at `take` items per page.
pub fn total_pages(total: i64, take: i64) -> i64 {
    let take = take.max(1);
    (total + take - 1) / take
}

/// Standard paginated list envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    /// Assemble an envelope from a fetched page and the total row count.
    pub fn new(items: Vec<T>, total: i64, window: &PageWindow) -> Self {
        Paginated {
            items,
            total,
            page: window.page,
            page_size: window.take,
            total_pages: total_pages(total, window.take),
        }
    }
}
