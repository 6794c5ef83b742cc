//! Service layer modules.
//!
//! Audited record operations, bulk actions, the audit trail writer, the
//! (simulated) reply mailer and gallery image URL handling.

pub mod audit;
pub mod bulk;
pub mod mailer;
pub mod media;
pub mod records;

pub use audit::log_admin_action;
pub use bulk::{BulkAction, BulkError, BulkResult};
pub use mailer::{DeliveryReceipt, Mailer};
