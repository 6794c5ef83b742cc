use axum::extract::{Path, State};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::{AdminAction, HasStatus, ResourceKind, TenderPosting, TenderStatus};
use crate::error::ApiError;
use crate::services::log_admin_action;
use crate::store::Resource;

/// Close a tender to further applications
pub async fn close_tender(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<DataResponse<TenderPosting>, ApiError> {
    let now = Utc::now();
    let (previous, mut tender) = state
        .store
        .tenders
        .update(id, |tender| {
            let previous = tender.status();
            if previous != TenderStatus::Closed {
                tender.set_status(TenderStatus::Closed, now);
            }
            previous
        })
        .ok_or_else(|| ApiError::not_found(format!("tender {} not found", id)))?;

    if previous == TenderStatus::Closed {
        return Err(ApiError::conflict(format!(
            "Tender {} is already closed",
            tender.reference_no
        )));
    }

    log_admin_action(
        &state.store,
        &auth.username,
        AdminAction::CloseTender,
        ResourceKind::Tender,
        Some(id),
        format!("Closed {}", tender.label()),
        serde_json::json!({ "from": previous }),
    );
    tracing::info!(admin = %auth.username, tender_id = %id, "Closed tender");

    tender.refresh(now.date_naive());
    Ok(DataResponse::new(tender))
}
