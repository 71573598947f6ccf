//! Reconciliation of unsynced leads into the CRM.
//!
//! The orchestrator reads the unsynced batch once, pushes each lead through
//! the idempotent upsert-or-recover path, and records every outcome so
//! callers always see partial-success detail.

pub mod services;

#[cfg(test)]
mod tests;
