// ABOUTME: Offset-based pagination for list endpoints
// ABOUTME: Sanitizes page/limit query input and wraps results with page metadata
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

//! Page/limit pagination.
//!
//! List endpoints accept `page` (1-based) and `limit` query parameters and
//! return a [`Paginated`] envelope whose `total_pages` satisfies
//! `total_pages == ceil(total_count / limit)`.

use serde::{Deserialize, Serialize};

/// Default page size when the client does not specify one
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Upper bound on page size to keep result sets bounded
pub const MAX_PAGE_SIZE: i64 = 100;

/// Raw pagination query parameters
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationParams {
    /// 1-based page number
    pub page: Option<i64>,
    /// Items per page (capped at [`MAX_PAGE_SIZE`])
    pub limit: Option<i64>,
}

impl PaginationParams {
    /// Sanitized 1-based page number
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Sanitized page size
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Row offset for SQL `LIMIT ... OFFSET ...`
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

/// A single page of results plus page metadata
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// 1-based page number served
    pub page: i64,
    /// Page size used
    pub limit: i64,
    /// Total matching items across all pages
    pub total_count: i64,
    /// `ceil(total_count / limit)`
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    /// Wrap a page of items with metadata derived from the total count
    #[must_use]
    pub fn new(items: Vec<T>, params: &PaginationParams, total_count: i64) -> Self {
        let limit = params.limit();
        Self {
            items,
            page: params.page(),
            limit,
            total_count,
            total_pages: (total_count + limit - 1) / limit,
        }
    }

    /// Map the item type while keeping page metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn params(page: Option<i64>, limit: Option<i64>) -> PaginationParams {
        PaginationParams { page, limit }
    }

    #[test]
    fn defaults_applied_when_absent() {
        let p = params(None, None);
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(params(None, Some(0)).limit(), 1);
        assert_eq!(params(None, Some(1000)).limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn total_pages_is_ceiling_of_count_over_limit() {
        let p = params(Some(1), Some(20));
        assert_eq!(Paginated::<()>::new(vec![], &p, 0).total_pages, 0);
        assert_eq!(Paginated::<()>::new(vec![], &p, 1).total_pages, 1);
        assert_eq!(Paginated::<()>::new(vec![], &p, 20).total_pages, 1);
        assert_eq!(Paginated::<()>::new(vec![], &p, 21).total_pages, 2);
        assert_eq!(Paginated::<()>::new(vec![], &p, 45).total_pages, 3);
    }

    #[test]
    fn offset_advances_with_page() {
        assert_eq!(params(Some(3), Some(10)).offset(), 20);
    }
}
