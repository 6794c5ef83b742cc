//! Static site pages (home, about, products, contact, ...)

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
pub struct SitePage {
    pub id: Uuid,
    pub title: String,
    /// Root-relative path, e.g. `/products/cathodes`
    pub slug: String,
    pub summary: String,
    pub status: PublishStatus,
    /// Display-only visit counter
    pub views: u64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePageRequest {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub status: PublishStatus,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdatePageRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Normalise a slug to a lowercase root-relative path
pub fn normalize_slug(raw: &str) -> Result<String, ValidationError> {
    let trimmed = require_text("slug", raw)?.to_lowercase();
    let path = trimmed.trim_matches('/');
    if path
        .chars()
        .any(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '/'))
    {
        return Err(ValidationError::new(
            "slug",
            "may only contain letters, digits, '-' and '/'",
        ));
    }
    Ok(format!("/{}", path))
}

impl Record for SitePage {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Editable for SitePage {
    type Create = CreatePageRequest;
    type Update = UpdatePageRequest;

    fn create(input: CreatePageRequest, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        Ok(Self {
            id: Uuid::new_v4(),
            title: require_text("title", &input.title)?,
            slug: normalize_slug(&input.slug)?,
            summary: input.summary.trim().to_string(),
            status: input.status,
            views: 0,
            updated_at: now,
        })
    }

    fn apply(&mut self, input: UpdatePageRequest) -> Result<(), ValidationError> {
        let mut next = self.clone();
        update_text("title", &mut next.title, input.title)?;
        if let Some(slug) = input.slug {
            next.slug = normalize_slug(&slug)?;
        }
        if let Some(summary) = input.summary {
            next.summary = summary.trim().to_string();
        }
        next.updated_at = Utc::now();
        *self = next;
        Ok(())
    }
}

impl HasStatus for SitePage {
    type Status = PublishStatus;

    fn status(&self) -> PublishStatus {
        self.status
    }

    fn set_status(&mut self, status: PublishStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}

impl Listable for SitePage {
    const LABEL: &'static str = "pages";
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "slug"];
    const FILTER_FIELDS: &'static [&'static str] = &["status"];
    const SORT_FIELDS: &'static [&'static str] = &["title", "slug", "views", "updated_at"];
    const DEFAULT_SORT: (&'static str, SortDirection) = ("title", SortDirection::Asc);

    fn search_text(&self, field: &str) -> Option<&str> {
        match field {
            "title" => Some(&self.title),
            "slug" => Some(&self.slug),
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
            "title" => SortValue::text(&self.title),
            "slug" => SortValue::text(&self.slug),
            "views" => SortValue::count(self.views),
            "updated_at" => SortValue::Timestamp(self.updated_at),
            _ => SortValue::Missing,
        }
    }
}

impl Resource for SitePage {
    const KIND: ResourceKind = ResourceKind::Page;
    const PATH: &'static str = "pages";

    fn collection(store: &AdminStore) -> &Collection<Self> {
        &store.pages
    }

    fn label(&self) -> String {
        self.title.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_is_normalised() {
        assert_eq!(normalize_slug("Products/Cathodes/").unwrap(), "/products/cathodes");
        assert_eq!(normalize_slug("/").unwrap(), "/");
        assert!(normalize_slug("about us").is_err());
        assert!(normalize_slug("").is_err());
    }
}
