//! In-memory record store
//!
//! Every collection lives behind its own lock; nothing is persisted across
//! restarts beyond what a backup snapshot captures while the process runs.

pub mod backup;
pub mod seed;

use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::*;
use crate::query::Listable;

pub use backup::StoreSnapshot;

/// A record type served through the generic resource routes
pub trait Resource:
    Record + Listable + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: ResourceKind;

    /// URL segment, e.g. `tender-applications`
    const PATH: &'static str;

    /// Whether the type has an archived status
    const ARCHIVABLE: bool = false;

    /// Whether the reply dialog applies
    const REPLYABLE: bool = false;

    fn collection(store: &AdminStore) -> &Collection<Self>;

    /// Short name used in audit summaries
    fn label(&self) -> String {
        self.id().to_string()
    }

    /// Move to the archived status. Returns whether anything changed.
    fn archive(&mut self) -> bool {
        false
    }

    /// Hook run when the record is opened in the view dialog.
    /// Returns whether the record changed.
    fn on_viewed(&mut self) -> bool {
        false
    }

    /// Recompute values derived from the current date before the record
    /// leaves the store.
    fn refresh(&mut self, _today: NaiveDate) {}
}

/// Ordered collection of records guarded by a read/write lock
pub struct Collection<T> {
    records: RwLock<Vec<T>>,
}

impl<T: Record + Clone> Collection<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Run `f` against the records under the read lock
    pub fn read<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.records.read())
    }

    pub fn get(&self, id: Uuid) -> Option<T> {
        self.records.read().iter().find(|r| r.id() == id).cloned()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.records.read().iter().any(|r| r.id() == id)
    }

    pub fn ids(&self) -> BTreeSet<Uuid> {
        self.records.read().iter().map(Record::id).collect()
    }

    pub fn count_where(&self, pred: impl Fn(&T) -> bool) -> usize {
        self.records.read().iter().filter(|r| pred(r)).count()
    }

    pub fn insert(&self, record: T) -> T {
        self.records.write().push(record.clone());
        record
    }

    /// Swap in a new version of an existing record
    pub fn replace(&self, record: T) -> bool {
        let mut records = self.records.write();
        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Mutate one record in place, returning `f`'s result and the updated record
    pub fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut T) -> R) -> Option<(R, T)> {
        let mut records = self.records.write();
        let record = records.iter_mut().find(|r| r.id() == id)?;
        let result = f(&mut *record);
        Some((result, record.clone()))
    }

    /// Apply `f` to every listed record; returns the ids `f` reported as changed
    pub fn update_many(&self, ids: &BTreeSet<Uuid>, mut f: impl FnMut(&mut T) -> bool) -> Vec<Uuid> {
        let mut records = self.records.write();
        records
            .iter_mut()
            .filter(|r| ids.contains(&r.id()))
            .filter_map(|r| {
                let changed = f(&mut *r);
                changed.then(|| r.id())
            })
            .collect()
    }

    pub fn remove(&self, id: Uuid) -> Option<T> {
        let mut records = self.records.write();
        let index = records.iter().position(|r| r.id() == id)?;
        Some(records.remove(index))
    }

    /// Remove every listed record; returns the ids actually removed
    pub fn remove_many(&self, ids: &BTreeSet<Uuid>) -> Vec<Uuid> {
        let mut records = self.records.write();
        let mut removed = Vec::new();
        records.retain(|r| {
            if ids.contains(&r.id()) {
                removed.push(r.id());
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.records.read().clone()
    }

    pub fn replace_all(&self, records: Vec<T>) {
        *self.records.write() = records;
    }
}

impl<T: Record + Clone> Default for Collection<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// All admin collections plus stored backup payloads
#[derive(Default)]
pub struct AdminStore {
    pub notices: Collection<Notice>,
    pub inquiries: Collection<Inquiry>,
    pub tenders: Collection<TenderPosting>,
    pub tender_applications: Collection<TenderApplication>,
    pub download_requests: Collection<DownloadRequest>,
    pub gallery: Collection<GalleryItem>,
    pub resources: Collection<ResourceDocument>,
    pub jobs: Collection<JobPosting>,
    pub pages: Collection<SitePage>,
    pub deadlines: Collection<Deadline>,
    pub audit_log: Collection<AuditEntry>,
    pub backups: Collection<Backup>,
    backup_payloads: RwLock<HashMap<Uuid, Arc<Vec<u8>>>>,
}

impl AdminStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store populated with the demo content shown on a fresh install
    pub fn seeded() -> Self {
        let store = Self::new();
        seed::populate(&store);
        store
    }

    /// Record counts per content collection
    pub fn counts(&self) -> Vec<(ResourceKind, usize)> {
        vec![
            (ResourceKind::Notice, self.notices.len()),
            (ResourceKind::Inquiry, self.inquiries.len()),
            (ResourceKind::Tender, self.tenders.len()),
            (ResourceKind::TenderApplication, self.tender_applications.len()),
            (ResourceKind::DownloadRequest, self.download_requests.len()),
            (ResourceKind::Gallery, self.gallery.len()),
            (ResourceKind::Resource, self.resources.len()),
            (ResourceKind::Job, self.jobs.len()),
            (ResourceKind::Page, self.pages.len()),
            (ResourceKind::Deadline, self.deadlines.len()),
        ]
    }
}
