//! Audit trail for the household ledger
//!
//! Every create, update and delete performed through the services is
//! appended to `audit.log` as one JSON object per line. Updates carry a
//! short field-level change summary.

mod diff;
mod entry;
mod logger;

pub use diff::summarize_changes;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
