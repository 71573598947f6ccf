//! Client port covering every CRM operation the orchestrators consume.

use crate::crm::domain::{
    CrmTaskId, FollowUpTask, MemberId, NewFollowUpTask, Person, PersonId, PersonUpsert,
    WorkspaceMember,
};
use crate::identity::{EmailAddress, PhoneKey};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for CRM client operations.
pub type CrmClientResult<T> = Result<T, CrmClientError>;

/// Outcome of an idempotent person upsert.
///
/// Some CRM bindings return the merged record directly; others only
/// acknowledge the write, in which case the caller must perform a
/// source-of-truth read-back by email to learn the definitive identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The CRM returned the person record; this is the definitive id.
    Resolved(PersonId),
    /// The CRM acknowledged the write without returning the record.
    Acknowledged,
}

/// CRM access contract; each operation is one network round trip.
#[async_trait]
pub trait CrmClient: Send + Sync {
    /// Finds a person by normalised email address.
    async fn find_person_by_email(
        &self,
        email: &EmailAddress,
    ) -> CrmClientResult<Option<PersonId>>;

    /// Finds a person by last-ten-digit phone key.
    async fn find_person_by_phone(&self, key: &PhoneKey) -> CrmClientResult<Option<PersonId>>;

    /// Creates or merges a person, keyed by identity.
    ///
    /// The operation itself must be idempotent: a retried upsert for the
    /// same email never creates a second person.
    ///
    /// # Errors
    ///
    /// Returns [`CrmClientError::Conflict`] when the create path lost a
    /// concurrent-duplicate race; callers recover through an identity
    /// lookup.
    async fn upsert_person(&self, payload: &PersonUpsert) -> CrmClientResult<UpsertOutcome>;

    /// Lists every workspace member.
    async fn list_members(&self) -> CrmClientResult<Vec<WorkspaceMember>>;

    /// Counts the open tasks currently assigned to a member.
    async fn count_open_tasks(&self, member: &MemberId) -> CrmClientResult<u64>;

    /// Lists every person record.
    async fn list_people(&self) -> CrmClientResult<Vec<Person>>;

    /// Lists every open follow-up task.
    async fn list_open_tasks(&self) -> CrmClientResult<Vec<FollowUpTask>>;

    /// Creates an open follow-up task and returns its identifier.
    async fn create_task(&self, task: &NewFollowUpTask) -> CrmClientResult<CrmTaskId>;
}

/// Errors returned by CRM client implementations.
#[derive(Debug, Clone, Error)]
pub enum CrmClientError {
    /// The CRM rejected the request with a non-success status.
    #[error("CRM error {status}: {message}")]
    Upstream {
        /// HTTP-level status reported by the CRM.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// A create collided with a concurrent create for the same identity.
    #[error("concurrent duplicate-create conflict: {0}")]
    Conflict(String),

    /// The CRM answered with a body the binding could not interpret.
    #[error("malformed CRM response: {0}")]
    MalformedResponse(String),

    /// The request never produced a CRM response.
    #[error("CRM transport failure: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl CrmClientError {
    /// Wraps a transport-level failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
