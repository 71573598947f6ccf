//! Repository port for lead persistence, identity lookup, and sync marking.

use crate::crm::domain::PersonId;
use crate::identity::{EmailAddress, PhoneKey, PhoneNumber};
use crate::lead::domain::{Lead, LeadId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for lead repository operations.
pub type LeadRepositoryResult<T> = Result<T, LeadRepositoryError>;

/// Search criteria for lead lookup; any present criterion may match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadQuery {
    /// Match by phone key derived from this number.
    pub phone: Option<PhoneNumber>,
    /// Match by normalised email.
    pub email: Option<EmailAddress>,
    /// Case-insensitive fragment of the first or last name.
    pub name: Option<String>,
}

impl LeadQuery {
    /// Whether the query carries no criteria at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.phone.is_none() && self.email.is_none() && self.name.is_none()
    }
}

/// Lead persistence contract.
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Stores a new lead.
    ///
    /// # Errors
    ///
    /// Returns [`LeadRepositoryError::DuplicateLead`] when the lead ID
    /// already exists, or [`LeadRepositoryError::DuplicateIdentity`] when
    /// another lead already owns the same email or phone key.
    async fn insert(&self, lead: &Lead) -> LeadRepositoryResult<()>;

    /// Records the CRM linkage for a lead, marking it synced.
    ///
    /// Marking an already-synced lead with the same person is a no-op so
    /// retried sync runs stay idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`LeadRepositoryError::NotFound`] when the lead does not
    /// exist, or [`LeadRepositoryError::LinkConflict`] when a different
    /// person is already linked.
    async fn mark_synced(&self, id: LeadId, person: &PersonId) -> LeadRepositoryResult<()>;

    /// Returns all leads without a CRM linkage, oldest first.
    async fn find_unsynced(&self) -> LeadRepositoryResult<Vec<Lead>>;

    /// Finds a lead by internal identifier.
    ///
    /// Returns `None` when the lead does not exist.
    async fn find_by_id(&self, id: LeadId) -> LeadRepositoryResult<Option<Lead>>;

    /// Finds a lead by normalised email address.
    async fn find_by_email(&self, email: &EmailAddress) -> LeadRepositoryResult<Option<LeadId>>;

    /// Finds a lead by last-ten-digit phone key.
    async fn find_by_phone(&self, key: &PhoneKey) -> LeadRepositoryResult<Option<LeadId>>;

    /// Returns leads matching any criterion of the query, oldest first.
    async fn search(&self, query: &LeadQuery) -> LeadRepositoryResult<Vec<Lead>>;
}

/// Errors returned by lead repository implementations.
#[derive(Debug, Clone, Error)]
pub enum LeadRepositoryError {
    /// A lead with the same identifier already exists.
    #[error("duplicate lead identifier: {0}")]
    DuplicateLead(LeadId),

    /// Another lead already owns the given contact point.
    #[error("duplicate lead identity: {0}")]
    DuplicateIdentity(String),

    /// The lead was not found.
    #[error("lead not found: {0}")]
    NotFound(LeadId),

    /// The lead is already linked to a different CRM person.
    #[error("lead {0} is already linked to a different CRM person")]
    LinkConflict(LeadId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl LeadRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
