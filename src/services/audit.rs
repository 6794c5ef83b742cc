//! Audit trail writer

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{AdminAction, AuditEntry, ResourceKind};
use crate::store::AdminStore;

/// Append an admin action to the audit log
pub fn log_admin_action(
    store: &AdminStore,
    actor: &str,
    action: AdminAction,
    entity: ResourceKind,
    target_id: Option<Uuid>,
    summary: impl Into<String>,
    details: serde_json::Value,
) -> AuditEntry {
    let entry = store.audit_log.insert(AuditEntry {
        id: Uuid::new_v4(),
        actor: actor.to_string(),
        action,
        entity,
        target_id,
        summary: summary.into(),
        details,
        created_at: Utc::now(),
    });

    tracing::info!(
        actor = %entry.actor,
        action = %action,
        entity = %entity,
        target_id = ?target_id,
        "Admin action logged"
    );

    entry
}

/// Most recent entries first
pub fn recent(store: &AdminStore, limit: usize) -> Vec<AuditEntry> {
    store.audit_log.read(|entries| {
        let mut recent: Vec<AuditEntry> = entries.iter().rev().take(limit).cloned().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent
    })
}
