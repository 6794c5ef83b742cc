//! Audit trail of admin actions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;

use super::{Record, ResourceKind};
use crate::query::{Listable, SortDirection, SortValue};
use crate::store::{AdminStore, Collection, Resource};

/// Admin action types for audit logging
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    Login,
    Logout,
    Create,
    Update,
    Delete,
    ChangeStatus,
    MarkRead,
    Reply,
    BulkArchive,
    BulkDelete,
    AddImage,
    RemoveImage,
    ReorderImages,
    CloseTender,
    CreateBackup,
    RestoreBackup,
    DeleteBackup,
}

impl std::fmt::Display for AdminAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_json::to_string(self).unwrap_or_default();
        write!(f, "{}", s.trim_matches('"'))
    }
}

/// Admin audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub actor: String,
    pub action: AdminAction,
    pub entity: ResourceKind,
    pub target_id: Option<Uuid>,
    /// One-line human description shown in the log table
    pub summary: String,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl Record for AuditEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Listable for AuditEntry {
    const LABEL: &'static str = "audit log entries";
    const SEARCH_FIELDS: &'static [&'static str] = &["actor", "summary"];
    const FILTER_FIELDS: &'static [&'static str] = &["action", "entity", "actor"];
    const SORT_FIELDS: &'static [&'static str] = &["created_at", "actor", "action", "entity"];
    const DEFAULT_SORT: (&'static str, SortDirection) = ("created_at", SortDirection::Desc);

    fn search_text(&self, field: &str) -> Option<&str> {
        match field {
            "actor" => Some(&self.actor),
            "summary" => Some(&self.summary),
            _ => None,
        }
    }

    fn filter_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "action" => Some(Cow::Owned(self.action.to_string())),
            "entity" => Some(Cow::Owned(self.entity.to_string())),
            "actor" => Some(Cow::Borrowed(&self.actor)),
            _ => None,
        }
    }

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "created_at" => SortValue::Timestamp(self.created_at),
            "actor" => SortValue::text(&self.actor),
            "action" => SortValue::text(&self.action.to_string()),
            "entity" => SortValue::text(&self.entity.to_string()),
            _ => SortValue::Missing,
        }
    }
}

impl Resource for AuditEntry {
    const KIND: ResourceKind = ResourceKind::AuditLog;
    const PATH: &'static str = "audit-logs";

    fn collection(store: &AdminStore) -> &Collection<Self> {
        &store.audit_log
    }
}
