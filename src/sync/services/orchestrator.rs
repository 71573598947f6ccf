//! Sync orchestrator driving the upsert-or-recover loop.

use crate::crm::adapters::CrmPersonDirectory;
use crate::crm::domain::{PersonId, PersonUpsert};
use crate::crm::ports::{CrmClient, CrmClientError, UpsertOutcome};
use crate::identity::{DirectoryError, EmailAddress, resolve_identity};
use crate::lead::domain::{Lead, LeadId};
use crate::lead::ports::{LeadRepository, LeadRepositoryError};
use serde::Serialize;
use serde::ser::SerializeStruct;
use std::sync::Arc;
use thiserror::Error;

/// Per-item failures collected while syncing one lead.
#[derive(Debug, Error)]
pub enum SyncItemError {
    /// The lead carries no email, which the CRM payload requires.
    #[error("lead has no email address")]
    MissingEmail,

    /// The upsert was acknowledged but the read-back found no person.
    #[error("upsert acknowledged but no person found for {0}")]
    Unresolved(EmailAddress),

    /// The CRM rejected the operation.
    #[error(transparent)]
    Crm(#[from] CrmClientError),

    /// Race recovery against the CRM directory failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// The lead store rejected the sync marking.
    #[error(transparent)]
    Store(#[from] LeadRepositoryError),
}

/// Failure detail naming the lead that could not be synced.
#[derive(Debug)]
pub struct SyncFailure {
    /// Lead that failed.
    pub lead: LeadId,
    /// Why it failed.
    pub error: SyncItemError,
}

impl Serialize for SyncFailure {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("SyncFailure", 2)?;
        state.serialize_field("lead", &self.lead)?;
        state.serialize_field("error", &self.error.to_string())?;
        state.end()
    }
}

/// Outcome of one sync run: both lists are always present so operators can
/// see exactly which identities need manual attention.
#[derive(Debug, Default)]
pub struct SyncReport {
    synced: Vec<LeadId>,
    failed: Vec<SyncFailure>,
}

impl SyncReport {
    /// Leads that were linked to a CRM person this run.
    #[must_use]
    pub fn synced(&self) -> &[LeadId] {
        &self.synced
    }

    /// Leads that failed, with per-item detail.
    #[must_use]
    pub fn failed(&self) -> &[SyncFailure] {
        &self.failed
    }

    /// Number of leads synced this run.
    #[must_use]
    pub fn synced_count(&self) -> usize {
        self.synced.len()
    }

    /// Number of leads that failed this run.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Total number of leads processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.synced.len() + self.failed.len()
    }
}

impl Serialize for SyncReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("SyncReport", 4)?;
        state.serialize_field("total", &self.total())?;
        state.serialize_field("synced_count", &self.synced_count())?;
        state.serialize_field("failed_count", &self.failed_count())?;
        state.serialize_field("failed", &self.failed)?;
        state.end()
    }
}

/// Run-level errors; per-item failures never surface here.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The unsynced batch could not be read at the start of the run.
    #[error("failed to read unsynced leads: {0}")]
    BatchRead(#[source] LeadRepositoryError),
}

/// Reconciliation service over the lead store and the CRM.
#[derive(Clone)]
pub struct SyncService<R, C>
where
    R: LeadRepository,
    C: CrmClient,
{
    leads: Arc<R>,
    crm: Arc<C>,
}

impl<R, C> SyncService<R, C>
where
    R: LeadRepository,
    C: CrmClient,
{
    /// Creates a new sync service.
    #[must_use]
    pub const fn new(leads: Arc<R>, crm: Arc<C>) -> Self {
        Self { leads, crm }
    }

    /// Synchronises every currently unsynced lead into the CRM.
    ///
    /// The batch is read once up front; leads created during the run are
    /// picked up by the next one. Per-item failures are collected, never
    /// raised, so one bad lead cannot abort the batch.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::BatchRead`] only when the initial batch read
    /// fails.
    pub async fn sync_unsynced(&self) -> Result<SyncReport, SyncError> {
        let batch = self
            .leads
            .find_unsynced()
            .await
            .map_err(SyncError::BatchRead)?;
        tracing::info!(batch = batch.len(), "starting lead sync run");

        let mut report = SyncReport::default();
        for lead in batch {
            match self.sync_one(&lead).await {
                Ok(person) => {
                    tracing::info!(lead = %lead.id(), person = %person, "lead synced");
                    report.synced.push(lead.id());
                }
                Err(error) => {
                    tracing::warn!(lead = %lead.id(), error = %error, "lead sync failed");
                    report.failed.push(SyncFailure {
                        lead: lead.id(),
                        error,
                    });
                }
            }
        }
        Ok(report)
    }

    async fn sync_one(&self, lead: &Lead) -> Result<PersonId, SyncItemError> {
        let payload = upsert_payload(lead)?;
        let person = match self.crm.upsert_person(&payload).await {
            Ok(UpsertOutcome::Resolved(id)) => id,
            Ok(UpsertOutcome::Acknowledged) => self.read_back(payload.email()).await?,
            Err(CrmClientError::Conflict(message)) => self.recover_race(lead, message).await?,
            Err(err) => return Err(SyncItemError::Crm(err)),
        };
        self.leads.mark_synced(lead.id(), &person).await?;
        Ok(person)
    }

    /// Source-of-truth read after an acknowledgement-only upsert response.
    async fn read_back(&self, email: &EmailAddress) -> Result<PersonId, SyncItemError> {
        let found = self.crm.find_person_by_email(email).await?;
        found.ok_or_else(|| SyncItemError::Unresolved(email.clone()))
    }

    /// A losing duplicate-create race that resolves to an existing person
    /// is success, not failure.
    async fn recover_race(&self, lead: &Lead, message: String) -> Result<PersonId, SyncItemError> {
        let directory = CrmPersonDirectory::new(&*self.crm);
        let resolved = resolve_identity(&directory, lead.identity()).await?;
        resolved.ok_or(SyncItemError::Crm(CrmClientError::Conflict(message)))
    }
}

/// Builds the CRM upsert payload from a lead's available fields.
///
/// Email is the one hard requirement; every other field is added through
/// the payload builder's silent-drop semantics.
fn upsert_payload(lead: &Lead) -> Result<PersonUpsert, SyncItemError> {
    let email = lead
        .identity()
        .email()
        .cloned()
        .ok_or(SyncItemError::MissingEmail)?;
    let mut payload =
        PersonUpsert::new(email).with_name(lead.name().first(), lead.name().last());
    if let Some(key) = lead.identity().phone_key() {
        payload = payload.with_phone(key);
    }
    if let Some(title) = &lead.profile().job_title {
        payload = payload.with_job_title(title);
    }
    if let Some(hint) = &lead.profile().credit_hint {
        payload = payload.with_budget_hint(hint);
    }
    Ok(payload)
}
