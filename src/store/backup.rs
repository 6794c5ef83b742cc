//! Whole-store snapshots for the backups page

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use super::AdminStore;
use crate::domain::*;

/// Snapshot format version written into every backup
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Backup not found")]
    NotFound,

    #[error("Backup payload could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Backup payload is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("Unsupported snapshot version {0}")]
    UnsupportedVersion(u32),
}

/// Every content collection at one point in time. The audit log and the
/// backups themselves are not part of a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub version: u32,
    pub captured_at: DateTime<Utc>,
    pub notices: Vec<Notice>,
    pub inquiries: Vec<Inquiry>,
    pub tenders: Vec<TenderPosting>,
    pub tender_applications: Vec<TenderApplication>,
    pub download_requests: Vec<DownloadRequest>,
    pub gallery: Vec<GalleryItem>,
    pub resources: Vec<ResourceDocument>,
    pub jobs: Vec<JobPosting>,
    pub pages: Vec<SitePage>,
    pub deadlines: Vec<Deadline>,
}

impl StoreSnapshot {
    pub fn capture(store: &AdminStore) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            captured_at: Utc::now(),
            notices: store.notices.snapshot(),
            inquiries: store.inquiries.snapshot(),
            tenders: store.tenders.snapshot(),
            tender_applications: store.tender_applications.snapshot(),
            download_requests: store.download_requests.snapshot(),
            gallery: store.gallery.snapshot(),
            resources: store.resources.snapshot(),
            jobs: store.jobs.snapshot(),
            pages: store.pages.snapshot(),
            deadlines: store.deadlines.snapshot(),
        }
    }

    pub fn record_count(&self) -> usize {
        self.notices.len()
            + self.inquiries.len()
            + self.tenders.len()
            + self.tender_applications.len()
            + self.download_requests.len()
            + self.gallery.len()
            + self.resources.len()
            + self.jobs.len()
            + self.pages.len()
            + self.deadlines.len()
    }

    /// Replace every content collection with the snapshot's records
    fn apply(self, store: &AdminStore) {
        store.notices.replace_all(self.notices);
        store.inquiries.replace_all(self.inquiries);
        store.tenders.replace_all(self.tenders);
        store.tender_applications.replace_all(self.tender_applications);
        store.download_requests.replace_all(self.download_requests);
        store.gallery.replace_all(self.gallery);
        store.resources.replace_all(self.resources);
        store.jobs.replace_all(self.jobs);
        store.pages.replace_all(self.pages);
        store.deadlines.replace_all(self.deadlines);
    }
}

impl AdminStore {
    /// Serialize every content collection and keep the payload in memory
    pub fn create_backup(&self, label: Option<&str>, created_by: &str) -> Result<Backup, BackupError> {
        let snapshot = StoreSnapshot::capture(self);
        let payload = serde_json::to_vec_pretty(&snapshot).map_err(BackupError::Encode)?;

        let label = label
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Backup {}", snapshot.captured_at.format("%Y-%m-%d %H:%M")));

        let backup = Backup {
            id: Uuid::new_v4(),
            label,
            created_by: created_by.to_string(),
            created_at: snapshot.captured_at,
            record_count: snapshot.record_count(),
            size_bytes: payload.len() as u64,
        };

        self.backup_payloads.write().insert(backup.id, Arc::new(payload));
        Ok(self.backups.insert(backup))
    }

    /// Raw JSON payload of a backup
    pub fn backup_payload(&self, id: Uuid) -> Option<Arc<Vec<u8>>> {
        self.backup_payloads.read().get(&id).cloned()
    }

    /// Replace every content collection with the backup's contents
    pub fn restore_backup(&self, id: Uuid) -> Result<Backup, BackupError> {
        let backup = self.backups.get(id).ok_or(BackupError::NotFound)?;
        let payload = self.backup_payload(id).ok_or(BackupError::NotFound)?;

        let snapshot: StoreSnapshot =
            serde_json::from_slice(&payload).map_err(BackupError::Corrupt)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(BackupError::UnsupportedVersion(snapshot.version));
        }

        snapshot.apply(self);
        Ok(backup)
    }

    pub fn delete_backup(&self, id: Uuid) -> Option<Backup> {
        self.backup_payloads.write().remove(&id);
        self.backups.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_brings_back_deleted_records() {
        let store = AdminStore::seeded();
        let before = store.notices.len();
        let backup = store.create_backup(Some("Before cleanup"), "admin").unwrap();
        assert_eq!(backup.label, "Before cleanup");
        assert!(backup.size_bytes > 0);
        assert_eq!(backup.record_count, StoreSnapshot::capture(&store).record_count());

        let ids = store.notices.ids();
        store.notices.remove_many(&ids);
        assert!(store.notices.is_empty());

        store.restore_backup(backup.id).unwrap();
        assert_eq!(store.notices.len(), before);
    }

    #[test]
    fn blank_label_gets_a_default() {
        let store = AdminStore::new();
        let backup = store.create_backup(Some("  "), "admin").unwrap();
        assert!(backup.label.starts_with("Backup "));
        assert_eq!(backup.record_count, 0);
    }

    #[test]
    fn deleted_backup_cannot_be_restored() {
        let store = AdminStore::new();
        let backup = store.create_backup(None, "admin").unwrap();
        assert!(store.backup_payload(backup.id).is_some());
        assert!(store.delete_backup(backup.id).is_some());
        assert!(store.backup_payload(backup.id).is_none());
        assert!(matches!(store.restore_backup(backup.id), Err(BackupError::NotFound)));
    }
}
