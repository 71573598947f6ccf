//! Domain model for locally captured leads.
//!
//! The lead domain models intake-time identity, profile attributes carried
//! toward the CRM, and the one-way transition from "local only" to "linked
//! to a CRM person", keeping infrastructure concerns outside the boundary.

mod error;
mod ids;
mod lead;

pub use error::LeadDomainError;
pub use ids::LeadId;
pub use lead::{Lead, LeadName, LeadProfile, PersistedLeadData};
