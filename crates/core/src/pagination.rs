//! Page/limit pagination over the slot-ordered clip feed.
//!
//! The feed is ordered in memory (pinned slots depend on the whole set), so
//! pagination slices the finished list instead of pushing `OFFSET` into SQL.

use crate::error::CoreError;

/// Default number of clips per page.
pub const DEFAULT_FEED_LIMIT: i64 = 12;

/// Largest page size a client may request.
pub const MAX_FEED_LIMIT: i64 = 100;

/// Validated `page` / `limit` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedPage {
    pub page: i64,
    pub limit: i64,
}

impl FeedPage {
    /// Validate raw query values, applying defaults for missing ones.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Result<Self, CoreError> {
        let page = page.unwrap_or(0);
        let limit = limit.unwrap_or(DEFAULT_FEED_LIMIT);

        if limit <= 0 || limit > MAX_FEED_LIMIT {
            return Err(CoreError::Validation(format!(
                "Limit must be between 1 and {MAX_FEED_LIMIT}"
            )));
        }
        if page < 0 {
            return Err(CoreError::Validation("Page cannot be negative".into()));
        }
        Ok(Self { page, limit })
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.limit)
    }

    /// Take this page out of a fully ordered list.
    ///
    /// Returns the page items and whether more items follow.
    pub fn slice<T>(&self, items: Vec<T>) -> (Vec<T>, bool) {
        let total = items.len();
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        let end = start.saturating_add(limit);
        let has_more = end < total;

        let page = items.into_iter().skip(start).take(limit).collect();
        (page, has_more)
    }
}
