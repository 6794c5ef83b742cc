//! Image management inside a gallery album

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{Created, DataResponse};
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::{AdminAction, GalleryItem, NewImage, ReorderImagesRequest, ResourceKind};
use crate::error::ApiError;
use crate::services::log_admin_action;
use crate::store::Resource;

fn album_not_found(id: Uuid) -> ApiError {
    ApiError::not_found(format!("gallery {} not found", id))
}

fn refreshed(mut album: GalleryItem) -> GalleryItem {
    album.refresh(Utc::now().date_naive());
    album
}

/// Append an image to an album
pub async fn add_image(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<NewImage>,
) -> Result<Created<DataResponse<GalleryItem>>, ApiError> {
    let (image, album) = state
        .store
        .gallery
        .update(id, |album| album.add_image(req))
        .ok_or_else(|| album_not_found(id))?;
    let image = image?;

    log_admin_action(
        &state.store,
        &auth.username,
        AdminAction::AddImage,
        ResourceKind::Gallery,
        Some(id),
        format!("Added image to {}", album.title),
        serde_json::json!({ "image_id": image.id, "url": image.url }),
    );

    Ok(Created(DataResponse::new(refreshed(album))))
}

pub async fn remove_image(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path((id, image_id)): Path<(Uuid, Uuid)>,
) -> Result<DataResponse<GalleryItem>, ApiError> {
    let (removed, album) = state
        .store
        .gallery
        .update(id, |album| album.remove_image(image_id))
        .ok_or_else(|| album_not_found(id))?;
    let removed = removed
        .ok_or_else(|| ApiError::not_found(format!("image {} not found in album", image_id)))?;

    log_admin_action(
        &state.store,
        &auth.username,
        AdminAction::RemoveImage,
        ResourceKind::Gallery,
        Some(id),
        format!("Removed image from {}", album.title),
        serde_json::json!({ "image_id": removed.id }),
    );

    Ok(DataResponse::new(refreshed(album)))
}

/// Reorder images; the first image becomes the album cover
pub async fn reorder_images(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReorderImagesRequest>,
) -> Result<DataResponse<GalleryItem>, ApiError> {
    let (result, album) = state
        .store
        .gallery
        .update(id, |album| album.reorder_images(&req.image_ids))
        .ok_or_else(|| album_not_found(id))?;
    result?;

    log_admin_action(
        &state.store,
        &auth.username,
        AdminAction::ReorderImages,
        ResourceKind::Gallery,
        Some(id),
        format!("Reordered images of {}", album.title),
        serde_json::json!({ "image_ids": req.image_ids }),
    );

    Ok(DataResponse::new(refreshed(album)))
}
