//! Audited record operations shared by the list endpoints and the
//! per-session list views.

use chrono::Utc;
use uuid::Uuid;

use super::audit::log_admin_action;
use super::mailer::{DeliveryReceipt, Mailer};
use crate::domain::{require_text, AdminAction, Editable, HasStatus, Repliable};
use crate::error::{ApiError, ApiResult};
use crate::store::{AdminStore, Resource};

fn not_found<T: Resource>(id: Uuid) -> ApiError {
    ApiError::not_found(format!("{} {} not found", T::KIND, id))
}

/// Fetch a record with its derived fields refreshed
pub fn get<T: Resource>(store: &AdminStore, id: Uuid) -> ApiResult<T> {
    let mut record = T::collection(store).get(id).ok_or_else(|| not_found::<T>(id))?;
    record.refresh(Utc::now().date_naive());
    Ok(record)
}

pub fn create<T: Resource + Editable>(store: &AdminStore, actor: &str, input: T::Create) -> ApiResult<T> {
    let mut record = T::create(input, Utc::now())?;
    record.refresh(Utc::now().date_naive());
    let record = T::collection(store).insert(record);

    log_admin_action(
        store,
        actor,
        AdminAction::Create,
        T::KIND,
        Some(record.id()),
        format!("Created {}", record.label()),
        serde_json::json!({}),
    );

    Ok(record)
}

pub fn update<T: Resource + Editable>(
    store: &AdminStore,
    actor: &str,
    id: Uuid,
    input: T::Update,
) -> ApiResult<T> {
    let (result, mut record) = T::collection(store)
        .update(id, |record| record.apply(input))
        .ok_or_else(|| not_found::<T>(id))?;
    result?;
    record.refresh(Utc::now().date_naive());

    log_admin_action(
        store,
        actor,
        AdminAction::Update,
        T::KIND,
        Some(id),
        format!("Updated {}", record.label()),
        serde_json::json!({}),
    );

    Ok(record)
}

pub fn delete<T: Resource>(store: &AdminStore, actor: &str, id: Uuid) -> ApiResult<T> {
    let record = T::collection(store).remove(id).ok_or_else(|| not_found::<T>(id))?;

    log_admin_action(
        store,
        actor,
        AdminAction::Delete,
        T::KIND,
        Some(id),
        format!("Deleted {}", record.label()),
        serde_json::json!({}),
    );

    Ok(record)
}

pub fn set_status<T: Resource + HasStatus>(
    store: &AdminStore,
    actor: &str,
    id: Uuid,
    status: T::Status,
) -> ApiResult<T> {
    let now = Utc::now();
    let (previous, mut record) = T::collection(store)
        .update(id, |record| {
            let previous = record.status();
            record.set_status(status, now);
            previous
        })
        .ok_or_else(|| not_found::<T>(id))?;
    record.refresh(now.date_naive());

    if previous != status {
        log_admin_action(
            store,
            actor,
            AdminAction::ChangeStatus,
            T::KIND,
            Some(id),
            format!("Changed status of {}", record.label()),
            serde_json::json!({ "from": previous, "to": status }),
        );
    }

    Ok(record)
}

/// Run the record's "opened in the view dialog" hook
pub fn mark_viewed<T: Resource>(store: &AdminStore, actor: &str, id: Uuid) -> ApiResult<T> {
    let (changed, record) = T::collection(store)
        .update(id, |record| record.on_viewed())
        .ok_or_else(|| not_found::<T>(id))?;

    if changed {
        log_admin_action(
            store,
            actor,
            AdminAction::MarkRead,
            T::KIND,
            Some(id),
            format!("Marked {} as read", record.label()),
            serde_json::json!({}),
        );
    }

    Ok(record)
}

/// Send a reply e-mail and record it on the submission
pub async fn reply<T: Resource + Repliable>(
    store: &AdminStore,
    mailer: &Mailer,
    actor: &str,
    id: Uuid,
    message: &str,
) -> ApiResult<(T, DeliveryReceipt)> {
    let message = require_text("message", message)?;
    let record = T::collection(store).get(id).ok_or_else(|| not_found::<T>(id))?;

    let (name, email) = record.reply_recipient();
    let receipt = mailer
        .send(name, email, &record.reply_subject(), &message)
        .await;

    // The record may have been deleted while the mail was in flight
    let ((), record) = T::collection(store)
        .update(id, |record| record.record_reply(message, receipt.sent_at))
        .ok_or_else(|| not_found::<T>(id))?;

    log_admin_action(
        store,
        actor,
        AdminAction::Reply,
        T::KIND,
        Some(id),
        format!("Replied to {}", record.label()),
        serde_json::json!({ "message_id": receipt.message_id, "to": receipt.to }),
    );

    Ok((record, receipt))
}
