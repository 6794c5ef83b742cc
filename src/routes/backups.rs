//! Snapshot backups of the record store

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderName},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{Created, DataResponse, NoContent};
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::{AdminAction, Backup, CreateBackupRequest, ResourceKind};
use crate::error::ApiError;
use crate::services::log_admin_action;

fn backup_not_found(id: Uuid) -> ApiError {
    ApiError::not_found(format!("backup {} not found", id))
}

/// An empty body means "no options"; anything else must be valid JSON
fn parse_create_request(body: &[u8]) -> Result<CreateBackupRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CreateBackupRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid backup request body: {}", e)))
}

/// Snapshot every content collection. The body is optional.
pub async fn create_backup(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Created<DataResponse<Backup>>, ApiError> {
    let req = parse_create_request(&body)?;
    let backup = state
        .store
        .create_backup(req.label.as_deref(), &auth.username)?;

    log_admin_action(
        &state.store,
        &auth.username,
        AdminAction::CreateBackup,
        ResourceKind::Backup,
        Some(backup.id),
        format!("Created backup {}", backup.label),
        serde_json::json!({ "record_count": backup.record_count, "size_bytes": backup.size_bytes }),
    );
    tracing::info!(
        admin = %auth.username,
        backup_id = %backup.id,
        records = backup.record_count,
        "Created backup"
    );

    Ok(Created(DataResponse::new(backup)))
}

/// Download the snapshot as a JSON file
pub async fn download_backup(
    _auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<([(HeaderName, String); 2], Vec<u8>), ApiError> {
    let backup = state.store.backups.get(id).ok_or_else(|| backup_not_found(id))?;
    let payload = state
        .store
        .backup_payload(id)
        .ok_or_else(|| backup_not_found(id))?;

    let filename = format!(
        "backup-{}.json",
        backup.created_at.format("%Y%m%d-%H%M%S")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        payload.as_ref().clone(),
    ))
}

/// Replace the content collections with the snapshot. Every open list
/// view loses its selection and dialog.
pub async fn restore_backup(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<DataResponse<Backup>, ApiError> {
    let backup = state.store.restore_backup(id)?;
    state.workspaces.reset_selections();

    log_admin_action(
        &state.store,
        &auth.username,
        AdminAction::RestoreBackup,
        ResourceKind::Backup,
        Some(id),
        format!("Restored backup {}", backup.label),
        serde_json::json!({ "record_count": backup.record_count }),
    );
    tracing::warn!(admin = %auth.username, backup_id = %id, "Restored backup");

    Ok(DataResponse::new(backup))
}

pub async fn delete_backup(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<NoContent, ApiError> {
    let backup = state
        .store
        .delete_backup(id)
        .ok_or_else(|| backup_not_found(id))?;

    log_admin_action(
        &state.store,
        &auth.username,
        AdminAction::DeleteBackup,
        ResourceKind::Backup,
        Some(id),
        format!("Deleted backup {}", backup.label),
        serde_json::json!({}),
    );

    Ok(NoContent)
}
