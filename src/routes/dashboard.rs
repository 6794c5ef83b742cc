//! Dashboard summary: counters, most visited pages, latest activity

use axum::extract::{Query, State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::{
    AuditEntry, InquiryStatus, JobStatus, PublishStatus, SitePage, TenderStatus,
};
use crate::error::ApiError;
use crate::query::{derive, normalize_search, ListQuery, SortDirection};
use crate::services::audit;

const DEFAULT_TOP_PAGES: u32 = 5;
const MAX_TOP_PAGES: u32 = 50;
const RECENT_ACTIVITY: usize = 5;
const DEADLINE_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Deserialize, Default)]
pub struct DashboardParams {
    pub search: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct DashboardCounts {
    pub new_inquiries: usize,
    pub pending_applications: usize,
    pub pending_download_requests: usize,
    pub published_notices: usize,
    pub open_tenders: usize,
    pub open_jobs: usize,
    pub upcoming_deadlines: usize,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub counts: DashboardCounts,
    pub top_pages: Vec<SitePage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_pages_empty_message: Option<String>,
    pub recent_activity: Vec<AuditEntry>,
}

/// GET /dashboard
pub async fn get_dashboard(
    _auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardParams>,
) -> Result<DataResponse<DashboardResponse>, ApiError> {
    let store = &state.store;
    let today = Utc::now().date_naive();

    let counts = DashboardCounts {
        new_inquiries: store.inquiries.count_where(|i| i.status == InquiryStatus::New),
        pending_applications: store.tender_applications.count_where(|a| a.status.is_pending()),
        pending_download_requests: store.download_requests.count_where(|r| r.status.is_pending()),
        published_notices: store.notices.count_where(|n| n.status == PublishStatus::Published),
        open_tenders: store.tenders.count_where(|t| t.status == TenderStatus::Published),
        open_jobs: store.jobs.count_where(|j| j.status == JobStatus::Open),
        upcoming_deadlines: store
            .deadlines
            .count_where(|d| d.is_due_within(today, DEADLINE_WINDOW_DAYS)),
    };

    let query = ListQuery {
        search: params.search.as_deref().and_then(normalize_search),
        sort_by: Some("views".to_string()),
        sort_order: Some(SortDirection::Desc),
        page: 1,
        page_size: params.limit.unwrap_or(DEFAULT_TOP_PAGES).clamp(1, MAX_TOP_PAGES),
        ..Default::default()
    };
    let top_pages = store.pages.read(|pages| derive(pages, &query));

    Ok(DataResponse::new(DashboardResponse {
        counts,
        top_pages: top_pages.items,
        top_pages_empty_message: top_pages.empty_message,
        recent_activity: audit::recent(store, RECENT_ACTIVITY),
    }))
}
