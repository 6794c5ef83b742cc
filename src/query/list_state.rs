//! Stateful list view: active filters, search, sort and page.
//!
//! Any change to what is listed (a filter, the search text, the sort, or
//! the page size) sends the view back to page 1.

use serde::Serialize;
use std::collections::BTreeMap;

use super::deriver::{normalize_filter, normalize_search, ListQuery, SortDirection, SortSpec};
use crate::api::pagination::PaginationParams;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListState {
    filters: BTreeMap<String, String>,
    search: Option<String>,
    sort: Option<SortSpec>,
    page: u32,
    page_size: u32,
}

impl ListState {
    pub fn new(page_size: u32) -> Self {
        Self {
            filters: BTreeMap::new(),
            search: None,
            sort: None,
            page: 1,
            page_size: page_size.clamp(1, PaginationParams::MAX_PER_PAGE),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Set or clear (`all` / blank) a filter. Returns whether anything changed.
    pub fn set_filter(&mut self, field: &str, value: &str) -> bool {
        let changed = match normalize_filter(value) {
            Some(value) if self.filters.get(field) == Some(&value) => false,
            Some(value) => {
                self.filters.insert(field.to_string(), value);
                true
            }
            None => self.filters.remove(field).is_some(),
        };
        self.reset_if(changed)
    }

    pub fn clear_filters(&mut self) -> bool {
        let changed = !self.filters.is_empty() || self.search.is_some();
        self.filters.clear();
        self.search = None;
        self.reset_if(changed)
    }

    pub fn set_search(&mut self, query: &str) -> bool {
        let search = normalize_search(query);
        let changed = search != self.search;
        self.search = search;
        self.reset_if(changed)
    }

    /// Column-header click: toggle direction on the active column, otherwise
    /// sort the new column ascending.
    pub fn sort_by(&mut self, field: &str) {
        let direction = match &self.sort {
            Some(current) if current.field == field => current.direction.toggled(),
            _ => SortDirection::Asc,
        };
        self.sort = Some(SortSpec::new(field, direction));
        self.page = 1;
    }

    pub fn set_sort(&mut self, field: &str, direction: SortDirection) -> bool {
        let sort = Some(SortSpec::new(field, direction));
        let changed = sort != self.sort;
        self.sort = sort;
        self.reset_if(changed)
    }

    pub fn set_page_size(&mut self, size: u32) -> bool {
        let size = size.clamp(1, PaginationParams::MAX_PER_PAGE);
        let changed = size != self.page_size;
        self.page_size = size;
        self.reset_if(changed)
    }

    pub fn first_page(&mut self) {
        self.page = 1;
    }

    pub fn prev_page(&mut self, total_pages: u32) {
        self.go_to_page(self.page.saturating_sub(1), total_pages);
    }

    pub fn next_page(&mut self, total_pages: u32) {
        self.go_to_page(self.page.saturating_add(1), total_pages);
    }

    pub fn last_page(&mut self, total_pages: u32) {
        self.page = total_pages.max(1);
    }

    pub fn go_to_page(&mut self, page: u32, total_pages: u32) {
        self.page = page.clamp(1, total_pages.max(1));
    }

    /// Pull the page back inside `[1, total_pages]` after the record set shrank.
    pub fn clamp(&mut self, total_pages: u32) {
        self.go_to_page(self.page, total_pages);
    }

    pub fn to_query(&self) -> ListQuery {
        ListQuery {
            filters: self.filters.clone(),
            search: self.search.clone(),
            sort_by: self.sort.as_ref().map(|s| s.field.clone()),
            sort_order: self.sort.as_ref().map(|s| s.direction),
            page: self.page,
            page_size: self.page_size,
        }
    }

    fn reset_if(&mut self, changed: bool) -> bool {
        if changed {
            self.page = 1;
        }
        changed
    }
}
