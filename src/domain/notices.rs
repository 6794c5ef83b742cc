//! Media notices
//!
//! Press releases, announcements and statutory notices published on the
//! media page.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;

use super::{require_text, update_text, Editable, HasStatus, PublishStatus, Record, ResourceKind, ValidationError};
use crate::query::{Listable, SortDirection, SortValue};
use crate::store::{AdminStore, Collection, Resource};

/// Media notice entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    pub status: PublishStatus,
    /// Display-only download counter
    pub downloads: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a notice
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNoticeRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub status: PublishStatus,
}

/// Request DTO for updating a notice
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateNoticeRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl Record for Notice {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Editable for Notice {
    type Create = CreateNoticeRequest;
    type Update = UpdateNoticeRequest;

    fn create(input: CreateNoticeRequest, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        Ok(Self {
            id: Uuid::new_v4(),
            title: require_text("title", &input.title)?,
            description: require_text("description", &input.description)?,
            category: require_text("category", &input.category)?,
            date: input.date.unwrap_or_else(|| now.date_naive()),
            status: input.status,
            downloads: 0,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, input: UpdateNoticeRequest) -> Result<(), ValidationError> {
        let mut next = self.clone();
        update_text("title", &mut next.title, input.title)?;
        update_text("description", &mut next.description, input.description)?;
        update_text("category", &mut next.category, input.category)?;
        if let Some(date) = input.date {
            next.date = date;
        }
        next.updated_at = Utc::now();
        *self = next;
        Ok(())
    }
}

impl HasStatus for Notice {
    type Status = PublishStatus;

    fn status(&self) -> PublishStatus {
        self.status
    }

    fn set_status(&mut self, status: PublishStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}

impl Listable for Notice {
    const LABEL: &'static str = "notices";
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "description", "category"];
    const FILTER_FIELDS: &'static [&'static str] = &["status", "category"];
    const SORT_FIELDS: &'static [&'static str] = &["title", "category", "date", "status", "downloads"];
    const DEFAULT_SORT: (&'static str, SortDirection) = ("date", SortDirection::Desc);

    fn search_text(&self, field: &str) -> Option<&str> {
        match field {
            "title" => Some(&self.title),
            "description" => Some(&self.description),
            "category" => Some(&self.category),
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
            "title" => SortValue::text(&self.title),
            "category" => SortValue::text(&self.category),
            "date" => SortValue::Date(self.date),
            "status" => SortValue::text(self.status.as_str()),
            "downloads" => SortValue::count(self.downloads),
            _ => SortValue::Missing,
        }
    }
}

impl Resource for Notice {
    const KIND: ResourceKind = ResourceKind::Notice;
    const PATH: &'static str = "notices";

    fn collection(store: &AdminStore) -> &Collection<Self> {
        &store.notices
    }

    fn label(&self) -> String {
        self.title.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateNoticeRequest {
        CreateNoticeRequest {
            title: " Quarterly production update ".into(),
            description: "Output rose 4%".into(),
            category: "Press Release".into(),
            date: None,
            status: PublishStatus::Published,
        }
    }

    #[test]
    fn create_trims_and_defaults_date() {
        let now = Utc::now();
        let notice = Notice::create(request(), now).unwrap();
        assert_eq!(notice.title, "Quarterly production update");
        assert_eq!(notice.date, now.date_naive());
        assert_eq!(notice.downloads, 0);
    }

    #[test]
    fn create_requires_category() {
        let mut req = request();
        req.category = String::new();
        let err = Notice::create(req, Utc::now()).unwrap_err();
        assert_eq!(err.field, "category");
    }

    #[test]
    fn failed_update_leaves_record_untouched() {
        let mut notice = Notice::create(request(), Utc::now()).unwrap();
        let err = notice.apply(UpdateNoticeRequest {
            title: Some("New title".into()),
            description: Some("  ".into()),
            ..Default::default()
        });
        assert!(err.is_err());
        assert_eq!(notice.title, "Quarterly production update");
    }
}
