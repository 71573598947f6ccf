//! Port contracts for lead persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by lead and sync
//! services.

pub mod repository;

pub use repository::{LeadQuery, LeadRepository, LeadRepositoryError, LeadRepositoryResult};
