use axum::{http::HeaderValue, Router};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::auth::SessionManager;
use crate::config::Settings;
use crate::middleware::request_id_layer;
use crate::routes;
use crate::services::Mailer;
use crate::store::AdminStore;
use crate::workspace::WorkspaceRegistry;

/// Shared application state
pub struct AppState {
    pub settings: Settings,
    pub store: AdminStore,
    pub sessions: SessionManager,
    /// Per-session list views
    pub workspaces: WorkspaceRegistry,
    pub mailer: Mailer,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(settings: Settings, store: AdminStore) -> Arc<Self> {
        let sessions = SessionManager::new(
            &settings.admin_username,
            &settings.admin_password,
            &settings.session_secret,
            settings.session_ttl_seconds,
        );
        let workspaces = WorkspaceRegistry::new(settings.default_page_size);
        let mailer = Mailer::new(&settings.reply_from, settings.reply_delay());

        Arc::new(Self {
            settings,
            store,
            sessions,
            workspaces,
            mailer,
            started_at: Utc::now(),
        })
    }
}

/// Build the complete application with all middleware
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = build_cors_layer(&state.settings);

    // DEBUG spans keep request tracing out of INFO output
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::DEBUG));

    let (set_request_id, propagate_request_id) = request_id_layer();
    let body_limit = RequestBodyLimitLayer::new(state.settings.max_body_bytes);

    Router::new()
        .merge(routes::api_router())
        // Middleware stack (applied bottom-up)
        .layer(body_limit)
        .layer(propagate_request_id)
        .layer(trace_layer)
        .layer(set_request_id)
        .layer(cors)
        .with_state(state)
}

fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .cors_allow_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let max_age = if settings.env.is_dev() {
        std::time::Duration::from_secs(86400)
    } else {
        std::time::Duration::from_secs(3600)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::list([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::PATCH,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            axum::http::HeaderName::from_static("x-request-id"),
        ]))
        .allow_credentials(true)
        .max_age(max_age)
}
