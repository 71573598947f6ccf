//! Locally captured sales leads pending CRM synchronisation.
//!
//! A lead is created once at intake, deduplicated against the store by
//! contact identity, and later linked to a CRM person by the sync
//! orchestrator. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
