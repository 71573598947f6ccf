//! Lead aggregate root and profile value types.

use super::{LeadDomainError, LeadId};
use crate::crm::domain::PersonId;
use crate::identity::ContactIdentity;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Trimmed first/last name pair captured at intake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadName {
    first: String,
    last: String,
}

impl LeadName {
    /// Creates a name pair, trimming both parts. Either part may be empty.
    #[must_use]
    pub fn new(first: &str, last: &str) -> Self {
        Self {
            first: first.trim().to_owned(),
            last: last.trim().to_owned(),
        }
    }

    /// Returns the trimmed first name.
    #[must_use]
    pub fn first(&self) -> &str {
        &self.first
    }

    /// Returns the trimmed last name.
    #[must_use]
    pub fn last(&self) -> &str {
        &self.last
    }
}

/// Free-form profile attributes carried toward the CRM.
///
/// All fields are optional; absent values are simply omitted from the CRM
/// upsert payload downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadProfile {
    /// City reported by the lead.
    pub city: Option<String>,
    /// Current job title.
    pub job_title: Option<String>,
    /// Current employer.
    pub company_name: Option<String>,
    /// Employment status.
    pub employment_status: Option<String>,
    /// Vehicle type of interest.
    pub vehicle_type: Option<String>,
    /// Free-form credit/budget hint; parsed to a number only when building
    /// the CRM payload.
    pub credit_hint: Option<String>,
}

/// Lead aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    id: LeadId,
    identity: ContactIdentity,
    name: LeadName,
    profile: LeadProfile,
    crm_link: Option<PersonId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted lead aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedLeadData {
    /// Persisted lead identifier.
    pub id: LeadId,
    /// Persisted contact identity.
    pub identity: ContactIdentity,
    /// Persisted name fields.
    pub name: LeadName,
    /// Persisted profile attributes.
    pub profile: LeadProfile,
    /// Persisted CRM linkage, if any.
    pub crm_link: Option<PersonId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// Creates a new unsynced lead at intake time.
    #[must_use]
    pub fn new(
        identity: ContactIdentity,
        name: LeadName,
        profile: LeadProfile,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: LeadId::new(),
            identity,
            name,
            profile,
            crm_link: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a lead from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedLeadData) -> Self {
        Self {
            id: data.id,
            identity: data.identity,
            name: data.name,
            profile: data.profile,
            crm_link: data.crm_link,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the lead identifier.
    #[must_use]
    pub const fn id(&self) -> LeadId {
        self.id
    }

    /// Returns the contact identity.
    #[must_use]
    pub const fn identity(&self) -> &ContactIdentity {
        &self.identity
    }

    /// Returns the name fields.
    #[must_use]
    pub const fn name(&self) -> &LeadName {
        &self.name
    }

    /// Returns the profile attributes.
    #[must_use]
    pub const fn profile(&self) -> &LeadProfile {
        &self.profile
    }

    /// Returns the linked CRM person, if the lead has been synced.
    #[must_use]
    pub const fn crm_link(&self) -> Option<&PersonId> {
        self.crm_link.as_ref()
    }

    /// Whether the lead has been synchronised into the CRM.
    ///
    /// True exactly when a CRM linkage is present; there is no separate
    /// synced flag to drift out of step.
    #[must_use]
    pub const fn is_synced(&self) -> bool {
        self.crm_link.is_some()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Links this lead to its CRM person.
    ///
    /// Relinking with the same person is a no-op so that retried sync runs
    /// stay idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`LeadDomainError::CrmLinkConflict`] when a different person
    /// is already linked.
    pub fn link_crm(
        &mut self,
        person: PersonId,
        clock: &impl Clock,
    ) -> Result<(), LeadDomainError> {
        match &self.crm_link {
            Some(existing) if *existing == person => Ok(()),
            Some(_) => Err(LeadDomainError::CrmLinkConflict(self.id)),
            None => {
                self.crm_link = Some(person);
                self.updated_at = clock.utc();
                Ok(())
            }
        }
    }
}
