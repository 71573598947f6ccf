//! Idempotent lead intake: resolve first, create only on a miss.

use crate::identity::{
    ContactIdentity, DirectoryError, EmailAddress, IdentityError, PhoneNumber, resolve_identity,
};
use crate::lead::adapters::LeadStoreDirectory;
use crate::lead::domain::{Lead, LeadId, LeadName, LeadProfile};
use crate::lead::ports::{LeadQuery, LeadRepository, LeadRepositoryError};
use mockable::Clock;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

/// Intake payload for a prospective lead.
///
/// Every field is optional at the wire level; validation happens when the
/// contact identity is assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IntakeLeadRequest {
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Phone number in any formatting.
    pub phone: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Job title.
    pub job_title: Option<String>,
    /// Employer.
    pub company_name: Option<String>,
    /// Employment status.
    pub employment_status: Option<String>,
    /// Vehicle type of interest.
    pub vehicle_type: Option<String>,
    /// Free-form credit/budget hint.
    pub current_credit: Option<String>,
}

impl IntakeLeadRequest {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name fields.
    #[must_use]
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Sets the city.
    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Sets the job title.
    #[must_use]
    pub fn with_job_title(mut self, job_title: impl Into<String>) -> Self {
        self.job_title = Some(job_title.into());
        self
    }

    /// Sets the credit hint.
    #[must_use]
    pub fn with_current_credit(mut self, hint: impl Into<String>) -> Self {
        self.current_credit = Some(hint.into());
        self
    }
}

/// Outcome of an intake call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// The identity already mapped to a stored lead.
    Existing(LeadId),
    /// A new lead was created.
    Created(LeadId),
}

impl IntakeOutcome {
    /// Returns the lead identifier regardless of branch.
    #[must_use]
    pub const fn lead_id(self) -> LeadId {
        match self {
            Self::Existing(id) | Self::Created(id) => id,
        }
    }
}

/// Service-level errors for lead intake and lookup.
#[derive(Debug, Error)]
pub enum LeadIntakeError {
    /// The supplied contact fields failed validation.
    #[error(transparent)]
    Identity(#[from] IdentityError),
    /// Identity resolution against the store failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] LeadRepositoryError),
}

/// Lead intake and lookup service.
#[derive(Clone)]
pub struct LeadIntakeService<R, C>
where
    R: LeadRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> LeadIntakeService<R, C>
where
    R: LeadRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new intake service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Ingests a lead, returning the existing record on an identity match.
    ///
    /// Intake is idempotent per identity: re-submitting the same email or
    /// phone never creates a second lead.
    ///
    /// # Errors
    ///
    /// Returns [`LeadIntakeError`] when the contact fields fail validation
    /// or the store rejects the lookup or insert.
    pub async fn intake(
        &self,
        request: IntakeLeadRequest,
    ) -> Result<IntakeOutcome, LeadIntakeError> {
        let email = request.email.map(EmailAddress::new).transpose()?;
        let phone = request.phone.map(PhoneNumber::new).transpose()?;
        let identity = ContactIdentity::new(email, phone)?;

        let directory = LeadStoreDirectory::new(&*self.repository);
        if let Some(existing) = resolve_identity(&directory, &identity).await? {
            return Ok(IntakeOutcome::Existing(existing));
        }

        let name = LeadName::new(
            request.first_name.as_deref().unwrap_or_default(),
            request.last_name.as_deref().unwrap_or_default(),
        );
        let profile = LeadProfile {
            city: request.city,
            job_title: request.job_title,
            company_name: request.company_name,
            employment_status: request.employment_status,
            vehicle_type: request.vehicle_type,
            credit_hint: request.current_credit,
        };
        let lead = Lead::new(identity, name, profile, &*self.clock);
        self.repository.insert(&lead).await?;
        Ok(IntakeOutcome::Created(lead.id()))
    }

    /// Retrieves the full lead record by identifier.
    ///
    /// Returns `Ok(None)` when no lead exists for the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`LeadIntakeError::Repository`] when the store lookup fails.
    pub async fn find_lead(&self, id: LeadId) -> Result<Option<Lead>, LeadIntakeError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Searches stored leads by phone, email, or name fragment.
    ///
    /// # Errors
    ///
    /// Returns [`LeadIntakeError::Repository`] when the store lookup fails.
    pub async fn search(&self, query: &LeadQuery) -> Result<Vec<Lead>, LeadIntakeError> {
        Ok(self.repository.search(query).await?)
    }
}
