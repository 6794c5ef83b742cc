//! Authentication routes
//!
//! A single admin account configured through the environment. Sessions
//! are HS256 tokens; logout revokes the token and drops the session's list
//! views.

use axum::{extract::State, http::HeaderMap, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{DataResponse, NoContent};
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::{AdminAction, ResourceKind};
use crate::error::ApiError;
use crate::middleware::RequestIdExt;
use crate::services::log_admin_action;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub username: String,
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<DataResponse<LoginResponse>, ApiError> {
    let username = req.username.trim();

    if !state.sessions.check_credentials(username, &req.password) {
        tracing::warn!(
            username = %username,
            request_id = headers.request_id().unwrap_or("-"),
            "Rejected admin login"
        );
        return Err(ApiError::unauthorized("Invalid username or password"));
    }

    let session = state
        .sessions
        .issue(username)
        .map_err(anyhow::Error::from)?;

    log_admin_action(
        &state.store,
        username,
        AdminAction::Login,
        ResourceKind::Session,
        Some(session.session_id),
        format!("{} signed in", username),
        serde_json::json!({}),
    );

    Ok(DataResponse::new(LoginResponse {
        access_token: session.token,
        token_type: "Bearer",
        expires_at: session.expires_at,
        username: username.to_string(),
    }))
}

/// POST /auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
) -> Result<NoContent, ApiError> {
    state.sessions.revoke(auth.claims());
    let dropped = state.workspaces.drop_session(auth.session_id);

    log_admin_action(
        &state.store,
        &auth.username,
        AdminAction::Logout,
        ResourceKind::Session,
        Some(auth.session_id),
        format!("{} signed out", auth.username),
        serde_json::json!({}),
    );
    tracing::debug!(session_id = %auth.session_id, views = dropped, "Dropped session views");

    Ok(NoContent)
}

/// GET /auth/me
pub async fn me(auth: RequireAuth) -> DataResponse<SessionResponse> {
    DataResponse::new(SessionResponse {
        username: auth.username.clone(),
        session_id: auth.session_id,
        expires_at: auth.expires_at,
    })
}
