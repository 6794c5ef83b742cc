//! Pagination utilities for list endpoints

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Pagination query parameters
#[derive(Debug, Clone, Copy, Deserialize, Default)]
pub struct PaginationParams {
    /// Page number (1-indexed)
    pub page: Option<u32>,

    /// Items per page
    pub per_page: Option<u32>,
}

impl PaginationParams {
    /// Maximum allowed items per page
    pub const MAX_PER_PAGE: u32 = 100;

    /// Returns the clamped per_page value, falling back to `default`
    pub fn per_page_or(&self, default: u32) -> u32 {
        self.per_page
            .unwrap_or(default)
            .clamp(1, Self::MAX_PER_PAGE)
    }

    /// Returns the page (1-indexed, minimum 1)
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
    /// 1-based index of the first visible row, 0 when nothing is visible
    pub showing_from: u64,
    /// 1-based index of the last visible row, 0 when nothing is visible
    pub showing_to: u64,
    pub summary: String,
}

impl PaginationMeta {
    /// Total number of pages for `total_items` at `per_page`; zero when empty.
    pub fn total_pages(total_items: u64, per_page: u32) -> u32 {
        let per_page = u64::from(per_page.max(1));
        let pages = total_items.div_ceil(per_page);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Build metadata for an already-clamped page.
    pub fn for_window(page: u32, per_page: u32, total_items: u64, visible: usize) -> Self {
        let total_pages = Self::total_pages(total_items, per_page);
        let (showing_from, showing_to) = if visible == 0 {
            (0, 0)
        } else {
            let from = u64::from(page - 1) * u64::from(per_page) + 1;
            (from, from + visible as u64 - 1)
        };

        Self {
            page,
            per_page,
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
            showing_from,
            showing_to,
            summary: format!(
                "Showing {} to {} of {} entries",
                showing_from, showing_to, total_items
            ),
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

impl<T: Serialize> IntoResponse for Paginated<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
