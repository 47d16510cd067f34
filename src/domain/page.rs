//! Pagination window and `{data, total}` result pairs.

use serde::Serialize;
use utoipa::ToSchema;

/// A clamped `limit`/`offset` window.
///
/// Built from raw query values with [`PageRequest::new`], which applies
/// the defaults (`limit = 10`, `offset = 0`), clamps `limit` to
/// `1..=100` and floors `offset` at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: i64,
    offset: i64,
}

impl PageRequest {
    /// Rows returned when no limit is given.
    pub const DEFAULT_LIMIT: i64 = 10;
    /// Upper bound on rows returned per page.
    pub const MAX_LIMIT: i64 = 100;

    /// Creates a window from optional raw values.
    #[must_use]
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }

    /// Maximum number of rows in the window.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.limit
    }

    /// Number of rows skipped before the window starts.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        self.offset
    }

    /// Cuts the window out of an already ordered, fully materialized list.
    ///
    /// `total` is the length of `items`, independent of the window.
    #[must_use]
    pub fn slice<T>(&self, items: Vec<T>) -> Page<T> {
        let total = i64::try_from(items.len()).unwrap_or(i64::MAX);
        let skip = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let take = usize::try_from(self.limit).unwrap_or(0);
        let data = items.into_iter().skip(skip).take(take).collect();
        Page { data, total }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of rows plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Page<T> {
    /// Rows inside the requested window.
    pub data: Vec<T>,
    /// Number of rows matching the query, ignoring the window.
    pub total: i64,
}

impl<T> Page<T> {
    /// Maps every row, keeping the total.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}
