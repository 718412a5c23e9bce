//! Page request parsing and pagination metadata.
//!
//! Page and limit values arrive as raw query strings. Anything that does not
//! parse or falls outside the accepted range is replaced by the default, so
//! building a [`PageRequest`] never fails.

use serde::Serialize;

/// Page used when none (or an invalid one) is requested.
pub const DEFAULT_PAGE: u32 = 1;
/// Limit used when none (or an invalid one) is requested.
pub const DEFAULT_LIMIT: u32 = 20;
/// Largest accepted limit.
pub const MAX_LIMIT: u32 = 100;

/// A validated page/limit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a page request, clamping invalid values to their defaults.
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: if page >= 1 { page } else { DEFAULT_PAGE },
            limit: if (1..=MAX_LIMIT).contains(&limit) {
                limit
            } else {
                DEFAULT_LIMIT
            },
        }
    }

    /// Parse raw `page` and `limit` query values.
    #[must_use]
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .and_then(|l| l.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_LIMIT);
        Self::new(page, limit)
    }

    /// Row offset of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.limit)
    }

    #[must_use]
    pub fn limit_i64(&self) -> i64 {
        i64::from(self.limit)
    }

    /// Metadata for this page given the total number of matching rows.
    #[must_use]
    pub fn paginate(&self, total: i64) -> Pagination {
        Pagination::new(self.page, self.limit, total)
    }
}

/// Position of a page within a filtered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Compute pagination metadata. `total_pages` is at least 1, even for an
    /// empty result set.
    #[must_use]
    pub fn new(page: u32, limit: u32, total: i64) -> Self {
        let total = total.max(0);
        let limit_i64 = i64::from(limit.max(1));
        let total_pages = ((total + limit_i64 - 1) / limit_i64).max(1);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: i64::from(page) < total_pages,
            has_prev: page > 1,
        }
    }
}
