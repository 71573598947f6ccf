//! Application services for lead-to-CRM reconciliation.

mod orchestrator;

pub use orchestrator::{SyncError, SyncFailure, SyncItemError, SyncReport, SyncService};
