//! Offset-based pagination types
//!
//! Pages are 1-indexed. The store returns the page of rows together with the
//! total number of rows matching the filters, and [`PaginationMeta`] derives
//! the page metadata callers render.
//!
//! # Usage
//!
//! ```rust,ignore
//! let page = PaginationArgs { page: Some(3), limit: Some(10) }.validate(&config)?;
//!
//! // In model
//! let (items, total) = Model::find_page(&filters, &page, pool).await?;
//!
//! let paginated = Paginated::new(items, &page, total);
//! ```

use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;

// ============================================================================
// Pagination Arguments
// ============================================================================

/// Raw page/limit input, both optional.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationArgs {
    /// 1-indexed page number (default 1).
    pub page: Option<u32>,
    /// Items per page (default from config).
    pub limit: Option<u32>,
}

impl PaginationArgs {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Validate against the configured bounds.
    ///
    /// Out-of-range values are rejected rather than clamped.
    pub fn validate(&self, config: &PaginationConfig) -> Result<PageRequest, &'static str> {
        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err("page must be at least 1");
        }

        let limit = self.limit.unwrap_or(config.default_limit);
        if limit < 1 {
            return Err("limit must be at least 1");
        }
        if limit > config.max_limit {
            return Err("limit exceeds the maximum page size");
        }

        Ok(PageRequest { page, limit })
    }
}

/// Validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// SQL OFFSET for this page.
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }

    /// SQL LIMIT for this page.
    pub fn fetch_limit(&self) -> i64 {
        self.limit as i64
    }
}

// ============================================================================
// Page metadata
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(request: &PageRequest, total: i64) -> Self {
        let limit = request.limit.max(1) as i64;
        let total_pages = (total + limit - 1) / limit;

        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages,
            has_next: (request.page as i64) < total_pages,
            has_prev: request.page > 1,
        }
    }
}

/// One page of results plus its metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, request: &PageRequest, total: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(request, total),
        }
    }
}
