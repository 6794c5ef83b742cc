pub mod auth;
pub mod backups;
pub mod dashboard;
pub mod gallery;
pub mod health;
pub mod records;
pub mod tenders;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;

use crate::app::AppState;
use crate::domain::{
    AuditEntry, Backup, Deadline, DownloadRequest, Editable, GalleryItem, HasStatus, Inquiry,
    JobPosting, Notice, Repliable, ResourceDocument, SitePage, TenderApplication, TenderPosting,
};
use crate::store::Resource;

type AppRouter = Router<Arc<AppState>>;

/// Build the API router with all routes
pub fn api_router() -> AppRouter {
    AppRouter::new()
        // Public routes
        .route("/health", get(health::health_check))
        // Session gate
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // Dashboard
        .route("/dashboard", get(dashboard::get_dashboard))
        // Audit trail (read-only)
        .route("/audit-logs", get(records::list::<AuditEntry>))
        .route("/audit-logs/:id", get(records::get_one::<AuditEntry>))
        // Backups
        .route(
            "/backups",
            get(records::list::<Backup>).post(backups::create_backup),
        )
        .route(
            "/backups/:id",
            get(records::get_one::<Backup>).delete(backups::delete_backup),
        )
        .route("/backups/:id/download", get(backups::download_backup))
        .route("/backups/:id/restore", post(backups::restore_backup))
        // Gallery images
        .route("/gallery/:id/images", post(gallery::add_image))
        .route("/gallery/:id/images/order", put(gallery::reorder_images))
        .route("/gallery/:id/images/:image_id", delete(gallery::remove_image))
        // Tenders
        .route("/tenders/:id/close", post(tenders::close_tender))
        // Submissions: triaged and answered, never authored here
        .resource::<Inquiry>()
        .with_status::<Inquiry>()
        .repliable::<Inquiry>()
        .resource::<TenderApplication>()
        .with_status::<TenderApplication>()
        .repliable::<TenderApplication>()
        .resource::<DownloadRequest>()
        .with_status::<DownloadRequest>()
        .repliable::<DownloadRequest>()
        // Authored content
        .resource::<Notice>()
        .editable::<Notice>()
        .with_status::<Notice>()
        .resource::<TenderPosting>()
        .editable::<TenderPosting>()
        .with_status::<TenderPosting>()
        .resource::<GalleryItem>()
        .editable::<GalleryItem>()
        .with_status::<GalleryItem>()
        .resource::<ResourceDocument>()
        .editable::<ResourceDocument>()
        .with_status::<ResourceDocument>()
        .resource::<JobPosting>()
        .editable::<JobPosting>()
        .with_status::<JobPosting>()
        .resource::<SitePage>()
        .editable::<SitePage>()
        .with_status::<SitePage>()
        .resource::<Deadline>()
        .editable::<Deadline>()
}

// ============================================================================
// Per-type route sets
// ============================================================================

trait ResourceRoutes {
    /// List, view, bulk, fetch and delete
    fn resource<T: Resource>(self) -> Self;

    fn editable<T: Resource + Editable>(self) -> Self;

    fn with_status<T: Resource + HasStatus>(self) -> Self;

    fn repliable<T: Resource + Repliable>(self) -> Self;
}

impl ResourceRoutes for AppRouter {
    fn resource<T: Resource>(self) -> Self {
        let base = format!("/{}", T::PATH);
        self.route(&base, get(records::list::<T>))
            .route(&format!("{}/bulk", base), post(records::bulk::<T>))
            .route(
                &format!("{}/view", base),
                get(records::view::<T>).post(records::view_command::<T>),
            )
            .route(
                &format!("{}/:id", base),
                get(records::get_one::<T>).delete(records::delete_one::<T>),
            )
    }

    fn editable<T: Resource + Editable>(self) -> Self {
        let base = format!("/{}", T::PATH);
        self.route(&base, post(records::create::<T>))
            .route(&format!("{}/:id", base), put(records::update::<T>))
    }

    fn with_status<T: Resource + HasStatus>(self) -> Self {
        self.route(
            &format!("/{}/:id/status", T::PATH),
            patch(records::set_status::<T>),
        )
    }

    fn repliable<T: Resource + Repliable>(self) -> Self {
        self.route(
            &format!("/{}/:id/reply", T::PATH),
            post(records::reply::<T>),
        )
    }
}
