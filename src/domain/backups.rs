//! Backup metadata; payloads are held by the store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;

use super::{Record, ResourceKind};
use crate::query::{Listable, SortDirection, SortValue};
use crate::store::{AdminStore, Collection, Resource};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backup {
    pub id: Uuid,
    pub label: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    /// Records across every collection in the snapshot
    pub record_count: usize,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CreateBackupRequest {
    #[serde(default)]
    pub label: Option<String>,
}

impl Record for Backup {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Listable for Backup {
    const LABEL: &'static str = "backups";
    const SEARCH_FIELDS: &'static [&'static str] = &["label", "created_by"];
    const FILTER_FIELDS: &'static [&'static str] = &["created_by"];
    const SORT_FIELDS: &'static [&'static str] = &["label", "created_at", "record_count", "size_bytes"];
    const DEFAULT_SORT: (&'static str, SortDirection) = ("created_at", SortDirection::Desc);

    fn search_text(&self, field: &str) -> Option<&str> {
        match field {
            "label" => Some(&self.label),
            "created_by" => Some(&self.created_by),
            _ => None,
        }
    }

    fn filter_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "created_by" => Some(Cow::Borrowed(&self.created_by)),
            _ => None,
        }
    }

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "label" => SortValue::text(&self.label),
            "created_at" => SortValue::Timestamp(self.created_at),
            "record_count" => SortValue::count(self.record_count as u64),
            "size_bytes" => SortValue::count(self.size_bytes),
            _ => SortValue::Missing,
        }
    }
}

impl Resource for Backup {
    const KIND: ResourceKind = ResourceKind::Backup;
    const PATH: &'static str = "backups";

    fn collection(store: &AdminStore) -> &Collection<Self> {
        &store.backups
    }

    fn label(&self) -> String {
        self.label.clone()
    }
}
