//! Bulk archive / delete over a set of record ids

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use uuid::Uuid;

use super::audit::log_admin_action;
use crate::domain::AdminAction;
use crate::store::{AdminStore, Resource};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Archive,
    Delete,
}

/// Outcome of a bulk action: which ids were acted on, which were already in
/// the target state and which did not exist
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BulkResult {
    pub action: BulkAction,
    pub affected: Vec<Uuid>,
    pub unchanged: Vec<Uuid>,
    pub missing: Vec<Uuid>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BulkError {
    #[error("No records selected")]
    NothingSelected,

    #[error("{0} cannot be archived")]
    NotArchivable(&'static str),
}

/// Apply `action` to every id and write one audit entry for the batch
pub fn apply<T: Resource>(
    store: &AdminStore,
    actor: &str,
    action: BulkAction,
    ids: &BTreeSet<Uuid>,
) -> Result<BulkResult, BulkError> {
    if ids.is_empty() {
        return Err(BulkError::NothingSelected);
    }

    let collection = T::collection(store);
    let mut unchanged = Vec::new();
    let affected = match action {
        BulkAction::Archive => {
            if !T::ARCHIVABLE {
                return Err(BulkError::NotArchivable(T::LABEL));
            }
            collection.update_many(ids, |record| {
                let changed = record.archive();
                if !changed {
                    unchanged.push(record.id());
                }
                changed
            })
        }
        BulkAction::Delete => collection.remove_many(ids),
    };

    let found: BTreeSet<Uuid> = affected.iter().chain(&unchanged).copied().collect();
    let missing: Vec<Uuid> = ids.difference(&found).copied().collect();

    let audit_action = match action {
        BulkAction::Archive => AdminAction::BulkArchive,
        BulkAction::Delete => AdminAction::BulkDelete,
    };
    let verb = match action {
        BulkAction::Archive => "Archived",
        BulkAction::Delete => "Deleted",
    };
    log_admin_action(
        store,
        actor,
        audit_action,
        T::KIND,
        None,
        format!("{} {} {}", verb, affected.len(), T::LABEL),
        serde_json::json!({ "affected": affected, "unchanged": unchanged, "missing": missing }),
    );

    Ok(BulkResult {
        action,
        affected,
        unchanged,
        missing,
    })
}
