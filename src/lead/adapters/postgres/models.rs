//! Diesel row models for lead persistence.

use super::schema::leads;
use crate::crm::domain::PersonId;
use crate::identity::{ContactIdentity, EmailAddress, IdentityError, PhoneNumber};
use crate::lead::domain::{Lead, LeadId, LeadName, LeadProfile, PersistedLeadData};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use thiserror::Error;

/// Query result row for lead records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = leads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LeadRow {
    /// Internal lead identifier.
    pub id: uuid::Uuid,
    /// Trimmed first name.
    pub first_name: String,
    /// Trimmed last name.
    pub last_name: String,
    /// Normalised email address.
    pub email: Option<String>,
    /// Raw phone number.
    pub phone: Option<String>,
    /// Derived phone match key.
    pub phone_key: Option<String>,
    /// City attribute.
    pub city: Option<String>,
    /// Job title attribute.
    pub job_title: Option<String>,
    /// Employer attribute.
    pub company_name: Option<String>,
    /// Employment status attribute.
    pub employment_status: Option<String>,
    /// Vehicle type attribute.
    pub vehicle_type: Option<String>,
    /// Credit hint attribute.
    pub credit_hint: Option<String>,
    /// Linked CRM person identifier.
    pub crm_person_id: Option<String>,
    /// Synced flag; must agree with `crm_person_id`.
    pub crm_synced: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for lead records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = leads)]
pub struct NewLeadRow {
    /// Internal lead identifier.
    pub id: uuid::Uuid,
    /// Trimmed first name.
    pub first_name: String,
    /// Trimmed last name.
    pub last_name: String,
    /// Normalised email address.
    pub email: Option<String>,
    /// Raw phone number.
    pub phone: Option<String>,
    /// Derived phone match key.
    pub phone_key: Option<String>,
    /// City attribute.
    pub city: Option<String>,
    /// Job title attribute.
    pub job_title: Option<String>,
    /// Employer attribute.
    pub company_name: Option<String>,
    /// Employment status attribute.
    pub employment_status: Option<String>,
    /// Vehicle type attribute.
    pub vehicle_type: Option<String>,
    /// Credit hint attribute.
    pub credit_hint: Option<String>,
    /// Linked CRM person identifier, always absent at intake.
    pub crm_person_id: Option<String>,
    /// Synced flag, always false at intake.
    pub crm_synced: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Integrity failures while loading persisted lead rows.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LeadRowError {
    /// A stored contact value no longer passes domain validation.
    #[error("lead {id} carries an invalid contact value: {source}")]
    InvalidContact {
        /// Offending row identifier.
        id: uuid::Uuid,
        /// Underlying validation failure.
        source: IdentityError,
    },

    /// The synced flag disagrees with the stored CRM linkage.
    #[error("lead {0} synced flag disagrees with its CRM linkage")]
    SyncFlagMismatch(uuid::Uuid),
}

/// Builds an insert row from a domain lead.
#[must_use]
pub fn to_new_row(lead: &Lead) -> NewLeadRow {
    let identity = lead.identity();
    NewLeadRow {
        id: lead.id().into_inner(),
        first_name: lead.name().first().to_owned(),
        last_name: lead.name().last().to_owned(),
        email: identity.email().map(|email| email.as_str().to_owned()),
        phone: identity.phone().map(|phone| phone.as_str().to_owned()),
        phone_key: identity.phone_key().map(|key| key.as_str().to_owned()),
        city: lead.profile().city.clone(),
        job_title: lead.profile().job_title.clone(),
        company_name: lead.profile().company_name.clone(),
        employment_status: lead.profile().employment_status.clone(),
        vehicle_type: lead.profile().vehicle_type.clone(),
        credit_hint: lead.profile().credit_hint.clone(),
        crm_person_id: lead.crm_link().map(|person| person.as_str().to_owned()),
        crm_synced: lead.is_synced(),
        created_at: lead.created_at(),
        updated_at: lead.updated_at(),
    }
}

/// Reconstructs a domain lead from a persisted row.
///
/// # Errors
///
/// Returns [`LeadRowError`] when stored contact values fail validation or
/// the synced flag disagrees with the linkage.
pub fn row_to_lead(row: LeadRow) -> Result<Lead, LeadRowError> {
    let LeadRow {
        id,
        first_name,
        last_name,
        email,
        phone,
        phone_key: _derived_phone_key,
        city,
        job_title,
        company_name,
        employment_status,
        vehicle_type,
        credit_hint,
        crm_person_id,
        crm_synced,
        created_at,
        updated_at,
    } = row;

    if crm_synced != crm_person_id.is_some() {
        return Err(LeadRowError::SyncFlagMismatch(id));
    }

    let parsed_email = email
        .map(EmailAddress::new)
        .transpose()
        .map_err(|source| LeadRowError::InvalidContact { id, source })?;
    let parsed_phone = phone
        .map(PhoneNumber::new)
        .transpose()
        .map_err(|source| LeadRowError::InvalidContact { id, source })?;
    let identity = ContactIdentity::new(parsed_email, parsed_phone)
        .map_err(|source| LeadRowError::InvalidContact { id, source })?;

    let data = PersistedLeadData {
        id: LeadId::from_uuid(id),
        identity,
        name: LeadName::new(&first_name, &last_name),
        profile: LeadProfile {
            city,
            job_title,
            company_name,
            employment_status,
            vehicle_type,
            credit_hint,
        },
        crm_link: crm_person_id.map(PersonId::new),
        created_at,
        updated_at,
    };
    Ok(Lead::from_persisted(data))
}
