//! Pagination helpers shared by the list queries.
//!
//! Callers speak in 1-indexed pages; the database speaks in a zero-indexed
//! inclusive row range. [`Pagination::row_range`] is the only place the two
//! meet.

use sea_orm::QuerySelect;
use serde::Serialize;

/// Page used when the caller gives none.
pub const DEFAULT_PAGE: u64 = 1;

/// Page size used when the caller gives none.
pub const DEFAULT_LIMIT: u64 = 10;

/// Highest row index the database driver can bind.
///
/// `OFFSET`/`LIMIT` travel as signed 64-bit integers, so every bound is kept
/// at or below `i64::MAX`.
pub const MAX_ROW: u64 = u64::MAX >> 1;

/// 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u64,
    limit: u64,
}

impl Pagination {
    /// Build a pagination from optional caller input.
    ///
    /// Missing values fall back to [`DEFAULT_PAGE`] and [`DEFAULT_LIMIT`];
    /// zero is raised to 1 and `limit` is capped at [`MAX_ROW`].
    #[must_use]
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_ROW),
        }
    }

    /// Page number, starting at 1.
    #[must_use]
    pub const fn page(self) -> u64 {
        self.page
    }

    /// Rows per page, between 1 and [`MAX_ROW`].
    #[must_use]
    pub const fn limit(self) -> u64 {
        self.limit
    }

    /// Zero-indexed inclusive row range for this page.
    ///
    /// Pages past [`MAX_ROW`] collapse onto the last addressable row, which
    /// the database answers with an empty page.
    #[must_use]
    pub const fn row_range(self) -> RowRange {
        let start = (self.page - 1).saturating_mul(self.limit);
        RowRange::new(start, start.saturating_add(self.limit - 1))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Zero-indexed inclusive `[start, end]` slice of an ordered result.
///
/// Always satisfies `start <= end <= MAX_ROW`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    start: u64,
    end: u64,
}

impl RowRange {
    /// Build a range, capping both bounds at [`MAX_ROW`] and raising `end` to `start`.
    #[must_use]
    pub const fn new(start: u64, end: u64) -> Self {
        let start = if start > MAX_ROW { MAX_ROW } else { start };
        let end = if end > MAX_ROW {
            MAX_ROW
        } else if end < start {
            start
        } else {
            end
        };
        Self { start, end }
    }

    /// First row, zero-indexed.
    #[must_use]
    pub const fn start(self) -> u64 {
        self.start
    }

    /// Last row, inclusive.
    #[must_use]
    pub const fn end(self) -> u64 {
        self.end
    }

    /// Number of rows covered by the range.
    #[must_use]
    pub const fn size(self) -> u64 {
        self.end - self.start + 1
    }
}

/// Applies a [`RowRange`] as `OFFSET`/`LIMIT` to any sea-orm select.
pub trait WithRowRange: QuerySelect {
    /// Restrict the query to the rows in `range`.
    #[must_use]
    fn with_row_range(self, range: RowRange) -> Self {
        self.offset(range.start()).limit(range.size())
    }
}

impl<Q: QuerySelect> WithRowRange for Q {}

/// One page of rows plus the exact number of rows matching the filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Rows inside the requested range.
    pub items: Vec<T>,
    /// Rows matching the filter, ignoring the range.
    pub count: u64,
}

/// Number of pages needed to show `count` rows at `limit` rows per page.
#[must_use]
pub const fn total_pages(count: u64, limit: u64) -> u64 {
    let limit = if limit == 0 { 1 } else { limit };
    count.div_ceil(limit)
}
