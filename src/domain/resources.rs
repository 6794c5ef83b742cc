//! Downloadable resources (reports, brochures, technical data sheets)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;

use super::{
    require_text, update_text, Editable, HasStatus, PublishStatus, Record, ResourceKind,
    ValidationError,
};
use crate::query::{Listable, SortDirection, SortValue};
use crate::store::{AdminStore, Collection, Resource};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDocument {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    /// e.g. "PDF", "XLSX"
    pub file_type: String,
    pub file_size_bytes: u64,
    pub description: String,
    pub uploaded_at: DateTime<Utc>,
    /// Display-only download counter
    pub downloads: u64,
    pub status: PublishStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateResourceRequest {
    pub title: String,
    pub category: String,
    pub file_type: String,
    #[serde(default)]
    pub file_size_bytes: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: PublishStatus,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateResourceRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub file_size_bytes: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Record for ResourceDocument {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Editable for ResourceDocument {
    type Create = CreateResourceRequest;
    type Update = UpdateResourceRequest;

    fn create(input: CreateResourceRequest, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        Ok(Self {
            id: Uuid::new_v4(),
            title: require_text("title", &input.title)?,
            category: require_text("category", &input.category)?,
            file_type: require_text("file_type", &input.file_type)?.to_uppercase(),
            file_size_bytes: input.file_size_bytes,
            description: input.description.trim().to_string(),
            uploaded_at: now,
            downloads: 0,
            status: input.status,
        })
    }

    fn apply(&mut self, input: UpdateResourceRequest) -> Result<(), ValidationError> {
        let mut next = self.clone();
        update_text("title", &mut next.title, input.title)?;
        update_text("category", &mut next.category, input.category)?;
        if let Some(file_type) = input.file_type {
            next.file_type = require_text("file_type", &file_type)?.to_uppercase();
        }
        if let Some(description) = input.description {
            next.description = description.trim().to_string();
        }
        next.file_size_bytes = input.file_size_bytes.unwrap_or(next.file_size_bytes);
        *self = next;
        Ok(())
    }
}

impl HasStatus for ResourceDocument {
    type Status = PublishStatus;

    fn status(&self) -> PublishStatus {
        self.status
    }

    fn set_status(&mut self, status: PublishStatus, _now: DateTime<Utc>) {
        self.status = status;
    }
}

impl Listable for ResourceDocument {
    const LABEL: &'static str = "resources";
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "category", "description"];
    const FILTER_FIELDS: &'static [&'static str] = &["status", "category", "file_type"];
    const SORT_FIELDS: &'static [&'static str] =
        &["title", "category", "file_type", "file_size_bytes", "uploaded_at", "downloads"];
    const DEFAULT_SORT: (&'static str, SortDirection) = ("uploaded_at", SortDirection::Desc);

    fn search_text(&self, field: &str) -> Option<&str> {
        match field {
            "title" => Some(&self.title),
            "category" => Some(&self.category),
            "description" => Some(&self.description),
            _ => None,
        }
    }

    fn filter_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            "category" => Some(Cow::Borrowed(&self.category)),
            "file_type" => Some(Cow::Borrowed(&self.file_type)),
            _ => None,
        }
    }

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "title" => SortValue::text(&self.title),
            "category" => SortValue::text(&self.category),
            "file_type" => SortValue::text(&self.file_type),
            "file_size_bytes" => SortValue::count(self.file_size_bytes),
            "uploaded_at" => SortValue::Timestamp(self.uploaded_at),
            "downloads" => SortValue::count(self.downloads),
            _ => SortValue::Missing,
        }
    }
}

impl Resource for ResourceDocument {
    const KIND: ResourceKind = ResourceKind::Resource;
    const PATH: &'static str = "resources";

    fn collection(store: &AdminStore) -> &Collection<Self> {
        &store.resources
    }

    fn label(&self) -> String {
        self.title.clone()
    }
}
