//! Error types for lead domain transitions.

use super::LeadId;
use thiserror::Error;

/// Errors returned while mutating lead aggregates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LeadDomainError {
    /// The lead is already linked to a different CRM person.
    #[error("lead {0} is already linked to a different CRM person")]
    CrmLinkConflict(LeadId),
}
