//! Requests for gated downloads (reports, technical sheets)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;

use super::{HasStatus, Record, Repliable, ResourceKind, ReviewStatus};
use crate::query::{Listable, SortDirection, SortValue};
use crate::store::{AdminStore, Collection, Resource};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    /// Resource the visitor asked for
    pub resource_id: Option<Uuid>,
    pub resource_title: String,
    pub category: String,
    pub purpose: String,
    pub status: ReviewStatus,
    pub submitted_at: DateTime<Utc>,
    pub replied_at: Option<DateTime<Utc>>,
    pub reply: Option<String>,
}

impl Record for DownloadRequest {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl HasStatus for DownloadRequest {
    type Status = ReviewStatus;

    fn status(&self) -> ReviewStatus {
        self.status
    }

    fn set_status(&mut self, status: ReviewStatus, _now: DateTime<Utc>) {
        self.status = status;
    }
}

impl Repliable for DownloadRequest {
    fn reply_recipient(&self) -> (&str, &str) {
        (&self.name, &self.email)
    }

    fn reply_subject(&self) -> String {
        format!("Your request for \"{}\"", self.resource_title)
    }

    fn record_reply(&mut self, message: String, at: DateTime<Utc>) {
        self.reply = Some(message);
        self.replied_at = Some(at);
        if self.status == ReviewStatus::New {
            self.status = ReviewStatus::Reviewed;
        }
    }
}

impl Listable for DownloadRequest {
    const LABEL: &'static str = "download requests";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email", "company", "resource_title", "purpose"];
    const FILTER_FIELDS: &'static [&'static str] = &["status", "category"];
    const SORT_FIELDS: &'static [&'static str] =
        &["name", "company", "resource_title", "category", "status", "submitted_at", "replied_at"];
    const DEFAULT_SORT: (&'static str, SortDirection) = ("submitted_at", SortDirection::Desc);

    fn search_text(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "email" => Some(&self.email),
            "company" => self.company.as_deref(),
            "resource_title" => Some(&self.resource_title),
            "purpose" => Some(&self.purpose),
            _ => None,
        }
    }

    fn filter_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            "category" => Some(Cow::Borrowed(&self.category)),
            _ => None,
        }
    }

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "name" => SortValue::text(&self.name),
            "company" => self.company.as_deref().map_or(SortValue::Missing, SortValue::text),
            "resource_title" => SortValue::text(&self.resource_title),
            "category" => SortValue::text(&self.category),
            "status" => SortValue::text(self.status.as_str()),
            "submitted_at" => SortValue::Timestamp(self.submitted_at),
            "replied_at" => self.replied_at.into(),
            _ => SortValue::Missing,
        }
    }
}

impl Resource for DownloadRequest {
    const KIND: ResourceKind = ResourceKind::DownloadRequest;
    const PATH: &'static str = "download-requests";
    const ARCHIVABLE: bool = true;
    const REPLYABLE: bool = true;

    fn collection(store: &AdminStore) -> &Collection<Self> {
        &store.download_requests
    }

    fn label(&self) -> String {
        format!("{} ({})", self.resource_title, self.name)
    }

    fn archive(&mut self) -> bool {
        let changed = self.status != ReviewStatus::Archived;
        self.status = ReviewStatus::Archived;
        changed
    }
}
