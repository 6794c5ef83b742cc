//! Domain types and DTOs
//!
//! These types define the records managed from the site admin: content the
//! admins author (notices, tenders, gallery, resources, jobs, pages,
//! deadlines) and submissions they triage (inquiries, tender applications,
//! download requests), plus the audit trail and backups.

pub mod audit;
pub mod backups;
pub mod deadlines;
pub mod downloads;
pub mod gallery;
pub mod inquiries;
pub mod jobs;
pub mod notices;
pub mod pages;
pub mod resources;
pub mod tenders;

pub use audit::*;
pub use backups::*;
pub use deadlines::*;
pub use downloads::*;
pub use gallery::*;
pub use inquiries::*;
pub use jobs::*;
pub use notices::*;
pub use pages::*;
pub use resources::*;
pub use tenders::*;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Anything stored in a collection
pub trait Record {
    fn id(&self) -> Uuid;
}

/// Records admins create and edit through forms
pub trait Editable: Sized {
    type Create: DeserializeOwned + Send + 'static;
    type Update: DeserializeOwned + Send + 'static;

    fn create(input: Self::Create, now: DateTime<Utc>) -> Result<Self, ValidationError>;

    fn apply(&mut self, input: Self::Update) -> Result<(), ValidationError>;
}

/// Records with a status column.
///
/// Any status may be set from any other; the admin UI suggests an order
/// (new → reviewed → replied/approved → archived) but nothing enforces it.
pub trait HasStatus {
    type Status: Serialize + DeserializeOwned + Copy + PartialEq + std::fmt::Debug + Send + 'static;

    fn status(&self) -> Self::Status;

    fn set_status(&mut self, status: Self::Status, now: DateTime<Utc>);
}

/// Submissions the admin can answer by e-mail
pub trait Repliable {
    fn reply_recipient(&self) -> (&str, &str);

    fn reply_subject(&self) -> String;

    fn record_reply(&mut self, message: String, at: DateTime<Utc>);
}

/// Every record type managed by the admin, used for routing and auditing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Notice,
    Inquiry,
    Tender,
    TenderApplication,
    DownloadRequest,
    Gallery,
    Resource,
    Job,
    Page,
    Deadline,
    AuditLog,
    Backup,
    Session,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_json::to_string(self).unwrap_or_default();
        write!(f, "{}", s.trim_matches('"'))
    }
}

/// Publication status shared by authored content
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PublishStatus {
    Published,
    #[default]
    Draft,
}

impl PublishStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Draft => "draft",
        }
    }
}

/// Triage status for tender applications and download requests
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    New,
    Reviewed,
    Approved,
    Rejected,
    Archived,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Reviewed => "reviewed",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Archived => "archived",
        }
    }

    /// Still waiting for a decision
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::New | Self::Reviewed)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Trimmed value of a required text field
pub fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::new(field, "is required"))
    } else {
        Ok(value.to_string())
    }
}

/// Apply an optional text update, rejecting blanks for required fields
pub fn update_text(
    field: &'static str,
    target: &mut String,
    value: Option<String>,
) -> Result<(), ValidationError> {
    if let Some(value) = value {
        *target = require_text(field, &value)?;
    }
    Ok(())
}

/// Drop blank entries from a list field
pub fn clean_lines(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}
