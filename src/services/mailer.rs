//! Outgoing reply e-mail.
//!
//! Delivery is simulated: the mailer waits for the configured delay, logs the
//! message and reports success. Nothing leaves the process.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::instrument;
use uuid::Uuid;

/// Result of a delivered reply
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReceipt {
    pub message_id: Uuid,
    pub to: String,
    pub subject: String,
    pub sent_at: DateTime<Utc>,
}

/// Reply sender shared by every repliable record type
#[derive(Clone)]
pub struct Mailer {
    from: String,
    delay: Duration,
}

impl Mailer {
    pub fn new(from: &str, delay: Duration) -> Self {
        tracing::info!(from = from, delay_ms = delay.as_millis() as u64, "Mailer initialized (simulated delivery)");
        Self {
            from: from.to_string(),
            delay,
        }
    }

    /// Send a reply. Completes after the configured delay; there is no retry,
    /// cancellation or timeout.
    #[instrument(skip(self, body), fields(from = %self.from))]
    pub async fn send(
        &self,
        to_name: &str,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> DeliveryReceipt {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let receipt = DeliveryReceipt {
            message_id: Uuid::new_v4(),
            to: format!("{} <{}>", to_name, to_email),
            subject: subject.to_string(),
            sent_at: Utc::now(),
        };

        tracing::info!(
            message_id = %receipt.message_id,
            to = %receipt.to,
            subject = %receipt.subject,
            body_len = body.len(),
            "Reply delivered"
        );

        receipt
    }
}
