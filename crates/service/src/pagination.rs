//! Pagination utilities for service layer
//!
//! Provides a simple `Pagination` struct and helpers to normalize inputs.

use serde::Serialize;

pub const DEFAULT_PER_PAGE: u64 = 5;
pub const MAX_PER_PAGE: u64 = 100;
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub page: u64,
    /// items per page
    pub per_page: u64,
}

impl Pagination {
    /// Missing values fall back to defaults, then everything is clamped.
    pub fn from_parts(page: Option<u64>, per_page: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE),
        }
        .normalized()
    }

    /// Clamp to sane defaults
    pub fn normalized(self) -> Self {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, MAX_PER_PAGE);
        Self { page, per_page }
    }

    /// Rows to skip before this page. Capped at `i64::MAX`, the largest
    /// OFFSET the SQL drivers bind; pages past that are simply empty.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.per_page)
            .min(MAX_OFFSET)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: DEFAULT_PER_PAGE } }
}

/// `ceil(total / per_page)`; zero when there is nothing to show.
pub fn total_pages(total: u64, per_page: u64) -> u64 {
    if per_page == 0 { 0 } else { total.div_ceil(per_page) }
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: u64, pagination: Pagination) -> Self {
        Self {
            data,
            total,
            page: pagination.page,
            limit: pagination.per_page,
            total_pages: total_pages(total, pagination.per_page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps_zero_to_defaults() {
        let p = Pagination { page: 0, per_page: 0 }.normalized();
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, 1);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let p = Pagination { page: 5, per_page: 1000 }.normalized();
        assert_eq!(p.page, 5);
        assert_eq!(p.per_page, 100);
        assert_eq!(p.offset(), 400);
    }

    #[test]
    fn offset_never_exceeds_signed_range() {
        let p = Pagination::from_parts(Some(u64::MAX), Some(100));
        assert_eq!(p.page, u64::MAX);
        assert_eq!(p.offset(), MAX_OFFSET);
        let p = Pagination::from_parts(Some(u64::MAX / 50), Some(100));
        assert_eq!(p.offset(), MAX_OFFSET);
    }

    #[test]
    fn default_values_are_sane() {
        let d = Pagination::default();
        assert_eq!(d.page, 1);
        assert_eq!(d.per_page, 5);
        assert_eq!(Pagination::from_parts(None, None), d);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
        assert_eq!(total_pages(12, 5), 3);
    }

    #[test]
    fn envelope_carries_metadata() {
        let page = Paginated::new(vec![1, 2], 7, Pagination::from_parts(Some(2), Some(5)));
        assert_eq!(page.page, 2);
        assert_eq!(page.limit, 5);
        assert_eq!(page.total, 7);
        assert_eq!(page.total_pages, 2);
    }
}
