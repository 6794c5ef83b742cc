//! Contact-form inquiries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;

use super::{HasStatus, Record, Repliable, ResourceKind};
use crate::query::{Listable, SortDirection, SortValue};
use crate::store::{AdminStore, Collection, Resource};

/// Inquiry status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    #[default]
    New,
    Read,
    Replied,
    Archived,
}

impl InquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Read => "read",
            Self::Replied => "replied",
            Self::Archived => "archived",
        }
    }
}

/// Inquiry received through the public contact form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: InquiryStatus,
    pub received_at: DateTime<Utc>,
    pub replied_at: Option<DateTime<Utc>>,
    pub reply: Option<String>,
}

impl Record for Inquiry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl HasStatus for Inquiry {
    type Status = InquiryStatus;

    fn status(&self) -> InquiryStatus {
        self.status
    }

    fn set_status(&mut self, status: InquiryStatus, _now: DateTime<Utc>) {
        self.status = status;
    }
}

impl Repliable for Inquiry {
    fn reply_recipient(&self) -> (&str, &str) {
        (&self.name, &self.email)
    }

    fn reply_subject(&self) -> String {
        format!("Re: {}", self.subject)
    }

    fn record_reply(&mut self, message: String, at: DateTime<Utc>) {
        self.reply = Some(message);
        self.replied_at = Some(at);
        self.status = InquiryStatus::Replied;
    }
}

impl Listable for Inquiry {
    const LABEL: &'static str = "inquiries";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email", "company", "subject"];
    const FILTER_FIELDS: &'static [&'static str] = &["status"];
    const SORT_FIELDS: &'static [&'static str] =
        &["name", "email", "company", "subject", "status", "received_at", "replied_at"];
    const DEFAULT_SORT: (&'static str, SortDirection) = ("received_at", SortDirection::Desc);

    fn search_text(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "email" => Some(&self.email),
            "company" => self.company.as_deref(),
            "subject" => Some(&self.subject),
            _ => None,
        }
    }

    fn filter_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            _ => None,
        }
    }

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "name" => SortValue::text(&self.name),
            "email" => SortValue::text(&self.email),
            "company" => self.company.as_deref().map_or(SortValue::Missing, SortValue::text),
            "subject" => SortValue::text(&self.subject),
            "status" => SortValue::text(self.status.as_str()),
            "received_at" => SortValue::Timestamp(self.received_at),
            "replied_at" => self.replied_at.into(),
            _ => SortValue::Missing,
        }
    }
}

impl Resource for Inquiry {
    const KIND: ResourceKind = ResourceKind::Inquiry;
    const PATH: &'static str = "inquiries";
    const ARCHIVABLE: bool = true;
    const REPLYABLE: bool = true;

    fn collection(store: &AdminStore) -> &Collection<Self> {
        &store.inquiries
    }

    fn label(&self) -> String {
        self.subject.clone()
    }

    fn archive(&mut self) -> bool {
        let changed = self.status != InquiryStatus::Archived;
        self.status = InquiryStatus::Archived;
        changed
    }

    /// Opening a new inquiry marks it read.
    fn on_viewed(&mut self) -> bool {
        if self.status == InquiryStatus::New {
            self.status = InquiryStatus::Read;
            true
        } else {
            false
        }
    }
}
