//! Photo gallery albums

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use uuid::Uuid;

use super::{
    require_text, update_text, Editable, HasStatus, PublishStatus, Record, ResourceKind,
    ValidationError,
};
use crate::query::{Listable, SortDirection, SortValue};
use crate::services::media;
use crate::store::{AdminStore, Collection, Resource};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: Uuid,
    pub url: String,
    #[serde(default)]
    pub caption: String,
    /// `url` when it can be rendered, otherwise the inline placeholder
    #[serde(skip_deserializing)]
    pub display_url: String,
}

impl GalleryImage {
    pub fn new(url: &str, caption: &str) -> Result<Self, ValidationError> {
        let url = require_text("url", url)?;
        let display_url = media::display_src(&url).into_owned();
        Ok(Self {
            id: Uuid::new_v4(),
            url,
            caption: caption.trim().to_string(),
            display_url,
        })
    }
}

/// Gallery album entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub location: String,
    pub category: String,
    /// Site section the album appears under (e.g. "operations", "community")
    pub section: String,
    pub images: Vec<GalleryImage>,
    pub status: PublishStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewImage {
    pub url: String,
    #[serde(default)]
    pub caption: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGalleryRequest {
    pub title: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub location: String,
    pub category: String,
    pub section: String,
    #[serde(default)]
    pub images: Vec<NewImage>,
    #[serde(default)]
    pub status: PublishStatus,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateGalleryRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReorderImagesRequest {
    pub image_ids: Vec<Uuid>,
}

impl GalleryItem {
    pub fn add_image(&mut self, image: NewImage) -> Result<GalleryImage, ValidationError> {
        let image = GalleryImage::new(&image.url, &image.caption)?;
        self.images.push(image.clone());
        Ok(image)
    }

    pub fn remove_image(&mut self, image_id: Uuid) -> Option<GalleryImage> {
        let index = self.images.iter().position(|i| i.id == image_id)?;
        Some(self.images.remove(index))
    }

    /// Put images in the given order. `order` must name every current image
    /// exactly once.
    pub fn reorder_images(&mut self, order: &[Uuid]) -> Result<(), ValidationError> {
        let current: HashSet<Uuid> = self.images.iter().map(|i| i.id).collect();
        let requested: HashSet<Uuid> = order.iter().copied().collect();
        if order.len() != self.images.len() || requested != current {
            return Err(ValidationError::new(
                "image_ids",
                "must list every image of the album exactly once",
            ));
        }

        let mut images = std::mem::take(&mut self.images);
        for id in order {
            if let Some(index) = images.iter().position(|i| i.id == *id) {
                self.images.push(images.swap_remove(index));
            }
        }
        Ok(())
    }

    pub fn cover(&self) -> Option<&GalleryImage> {
        self.images.first()
    }
}

impl Record for GalleryItem {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Editable for GalleryItem {
    type Create = CreateGalleryRequest;
    type Update = UpdateGalleryRequest;

    fn create(input: CreateGalleryRequest, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let images = input
            .images
            .iter()
            .map(|i| GalleryImage::new(&i.url, &i.caption))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: Uuid::new_v4(),
            title: require_text("title", &input.title)?,
            date: input.date.unwrap_or_else(|| now.date_naive()),
            location: input.location.trim().to_string(),
            category: require_text("category", &input.category)?,
            section: require_text("section", &input.section)?,
            images,
            status: input.status,
            created_at: now,
        })
    }

    fn apply(&mut self, input: UpdateGalleryRequest) -> Result<(), ValidationError> {
        let mut next = self.clone();
        update_text("title", &mut next.title, input.title)?;
        update_text("category", &mut next.category, input.category)?;
        update_text("section", &mut next.section, input.section)?;
        if let Some(location) = input.location {
            next.location = location.trim().to_string();
        }
        next.date = input.date.unwrap_or(next.date);
        *self = next;
        Ok(())
    }
}

impl HasStatus for GalleryItem {
    type Status = PublishStatus;

    fn status(&self) -> PublishStatus {
        self.status
    }

    fn set_status(&mut self, status: PublishStatus, _now: DateTime<Utc>) {
        self.status = status;
    }
}

impl Listable for GalleryItem {
    const LABEL: &'static str = "gallery items";
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "location", "category"];
    const FILTER_FIELDS: &'static [&'static str] = &["status", "category", "section"];
    const SORT_FIELDS: &'static [&'static str] = &["title", "date", "location", "category", "created_at"];
    const DEFAULT_SORT: (&'static str, SortDirection) = ("date", SortDirection::Desc);

    fn search_text(&self, field: &str) -> Option<&str> {
        match field {
            "title" => Some(&self.title),
            "location" => Some(&self.location),
            "category" => Some(&self.category),
            _ => None,
        }
    }

    fn filter_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            "category" => Some(Cow::Borrowed(&self.category)),
            "section" => Some(Cow::Borrowed(&self.section)),
            _ => None,
        }
    }

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "title" => SortValue::text(&self.title),
            "date" => SortValue::Date(self.date),
            "location" => SortValue::text(&self.location),
            "category" => SortValue::text(&self.category),
            "created_at" => SortValue::Timestamp(self.created_at),
            _ => SortValue::Missing,
        }
    }
}

impl Resource for GalleryItem {
    const KIND: ResourceKind = ResourceKind::Gallery;
    const PATH: &'static str = "gallery";

    fn collection(store: &AdminStore) -> &Collection<Self> {
        &store.gallery
    }

    fn label(&self) -> String {
        self.title.clone()
    }

    fn refresh(&mut self, _today: NaiveDate) {
        for image in &mut self.images {
            image.display_url = media::display_src(&image.url).into_owned();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album() -> GalleryItem {
        GalleryItem::create(
            CreateGalleryRequest {
                title: "Smelter open day".into(),
                date: None,
                location: "Antofagasta".into(),
                category: "Events".into(),
                section: "community".into(),
                images: vec![
                    NewImage { url: "https://cdn.example.com/a.jpg".into(), caption: "A".into() },
                    NewImage { url: "/uploads/b.jpg".into(), caption: "B".into() },
                    NewImage { url: "not a url".into(), caption: "C".into() },
                ],
                status: PublishStatus::Draft,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn broken_image_url_gets_placeholder() {
        let album = album();
        assert_eq!(album.images[0].display_url, "https://cdn.example.com/a.jpg");
        assert_eq!(album.images[1].display_url, "/uploads/b.jpg");
        assert_eq!(album.images[2].display_url, media::PLACEHOLDER_IMAGE);
    }

    #[test]
    fn reorder_requires_full_permutation() {
        let mut album = album();
        let ids: Vec<Uuid> = album.images.iter().map(|i| i.id).collect();

        let reversed: Vec<Uuid> = ids.iter().rev().copied().collect();
        album.reorder_images(&reversed).unwrap();
        assert_eq!(album.cover().map(|i| i.caption.as_str()), Some("C"));

        assert!(album.reorder_images(&ids[..2]).is_err());
        assert!(album.reorder_images(&[ids[0], ids[0], ids[1]]).is_err());
        let order: Vec<Uuid> = album.images.iter().map(|i| i.id).collect();
        assert_eq!(order, reversed);
    }

    #[test]
    fn add_and_remove_image() {
        let mut album = album();
        let added = album
            .add_image(NewImage { url: "https://cdn.example.com/d.jpg".into(), caption: String::new() })
            .unwrap();
        assert_eq!(album.images.len(), 4);
        assert!(album.remove_image(added.id).is_some());
        assert!(album.remove_image(added.id).is_none());
        assert!(album
            .add_image(NewImage { url: " ".into(), caption: String::new() })
            .is_err());
    }
}
