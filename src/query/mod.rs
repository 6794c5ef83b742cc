//! List management shared by every admin collection
//!
//! - [`deriver`]: the filter → sort → paginate pipeline
//! - [`list_state`]: filter/sort/page state with a single page-reset rule
//! - [`selection`]: checked rows for bulk actions
//! - [`modal`]: the record currently open in a dialog

pub mod deriver;
pub mod list_state;
pub mod modal;
pub mod selection;

pub use deriver::{
    derive, ensure_filter_field, ensure_sort_field, normalize_search, ListQuery, Listable, Page,
    SortDirection, SortSpec, SortValue,
};
pub use list_state::ListState;
pub use modal::{ModalKind, ModalState};
pub use selection::SelectionState;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Unknown filter field '{0}'")]
    UnknownFilter(String),

    #[error("Unknown sort field '{0}'")]
    UnknownSortField(String),

    #[error("Invalid sort order '{0}', expected 'asc' or 'desc'")]
    InvalidSortOrder(String),

    #[error("Invalid value '{value}' for '{param}'")]
    InvalidNumber { param: &'static str, value: String },
}
