//! Handlers shared by every record type, instantiated per type in
//! [`super::api_router`].

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{Created, DataResponse, NoContent, Paginated};
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::{Editable, HasStatus, Record, Repliable};
use crate::error::ApiError;
use crate::query::{derive, ListQuery};
use crate::services::{bulk, records, BulkAction, BulkResult, DeliveryReceipt};
use crate::store::Resource;
use crate::workspace::{RenderedView, ViewCommand};

// ============================================================================
// Request / response bodies
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StatusUpdate<S> {
    pub status: S,
}

#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ReplyResponse<T> {
    pub record: T,
    pub delivery: DeliveryReceipt,
}

#[derive(Debug, Deserialize)]
pub struct BulkRequest {
    pub action: BulkAction,
    #[serde(default)]
    pub ids: Vec<Uuid>,
}

// ============================================================================
// Stateless list and single-record endpoints
// ============================================================================

/// Filter, sort and paginate a collection from query-string parameters
pub async fn list<T: Resource>(
    _auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Paginated<T>, ApiError> {
    let query = ListQuery::from_params(&params, state.settings.default_page_size)?;
    query.validate::<T>()?;

    let page = T::collection(&state.store).read(|records| derive(records, &query));

    tracing::debug!(
        kind = %T::KIND,
        page = page.meta.page,
        total = page.meta.total_items,
        "Listed records"
    );

    let today = Utc::now().date_naive();
    let data = page
        .items
        .into_iter()
        .map(|mut record| {
            record.refresh(today);
            record
        })
        .collect();

    Ok(Paginated {
        data,
        pagination: page.meta,
        empty_message: page.empty_message,
    })
}

pub async fn get_one<T: Resource>(
    _auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<DataResponse<T>, ApiError> {
    Ok(DataResponse::new(records::get::<T>(&state.store, id)?))
}

pub async fn delete_one<T: Resource>(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<NoContent, ApiError> {
    records::delete::<T>(&state.store, &auth.username, id)?;
    tracing::info!(admin = %auth.username, kind = %T::KIND, id = %id, "Deleted record");
    Ok(NoContent)
}

pub async fn create<T: Resource + Editable>(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Json(req): Json<T::Create>,
) -> Result<Created<DataResponse<T>>, ApiError> {
    let record = records::create::<T>(&state.store, &auth.username, req)?;
    tracing::info!(admin = %auth.username, kind = %T::KIND, id = %record.id(), "Created record");
    Ok(Created(DataResponse::new(record)))
}

pub async fn update<T: Resource + Editable>(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<T::Update>,
) -> Result<DataResponse<T>, ApiError> {
    let record = records::update::<T>(&state.store, &auth.username, id, req)?;
    tracing::info!(admin = %auth.username, kind = %T::KIND, id = %id, "Updated record");
    Ok(DataResponse::new(record))
}

pub async fn set_status<T: Resource + HasStatus>(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusUpdate<T::Status>>,
) -> Result<DataResponse<T>, ApiError> {
    let record = records::set_status::<T>(&state.store, &auth.username, id, req.status)?;
    tracing::info!(
        admin = %auth.username,
        kind = %T::KIND,
        id = %id,
        status = ?req.status,
        "Changed record status"
    );
    Ok(DataResponse::new(record))
}

/// Reply by e-mail; the response is sent once delivery completes
pub async fn reply<T: Resource + Repliable>(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReplyRequest>,
) -> Result<DataResponse<ReplyResponse<T>>, ApiError> {
    let (record, delivery) =
        records::reply::<T>(&state.store, &state.mailer, &auth.username, id, &req.message).await?;

    tracing::info!(
        admin = %auth.username,
        kind = %T::KIND,
        id = %id,
        message_id = %delivery.message_id,
        "Sent reply"
    );

    Ok(DataResponse::new(ReplyResponse { record, delivery }))
}

pub async fn bulk<T: Resource>(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Json(req): Json<BulkRequest>,
) -> Result<DataResponse<BulkResult>, ApiError> {
    let ids: BTreeSet<Uuid> = req.ids.into_iter().collect();
    let result = bulk::apply::<T>(&state.store, &auth.username, req.action, &ids)?;

    tracing::info!(
        admin = %auth.username,
        kind = %T::KIND,
        action = ?result.action,
        affected = result.affected.len(),
        missing = result.missing.len(),
        "Applied bulk action"
    );

    Ok(DataResponse::new(result))
}

// ============================================================================
// Per-session list views
// ============================================================================

pub async fn view<T: Resource>(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
) -> Result<DataResponse<RenderedView<T>>, ApiError> {
    let view = state.workspaces.view(auth.session_id, auth.expires_at, T::KIND);
    let rendered = view.lock().render::<T>(&state.store, Utc::now().date_naive());
    Ok(DataResponse::new(rendered))
}

/// Apply one command to the session's view and return the re-rendered view
pub async fn view_command<T: Resource>(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Json(command): Json<ViewCommand>,
) -> Result<DataResponse<RenderedView<T>>, ApiError> {
    let view = state.workspaces.view(auth.session_id, auth.expires_at, T::KIND);
    let mut view = view.lock();

    let bulk_result = view.apply::<T>(&state.store, &auth.username, command)?;
    let mut rendered = view.render::<T>(&state.store, Utc::now().date_naive());
    rendered.bulk_result = bulk_result;

    Ok(DataResponse::new(rendered))
}
