//! Thread-safe in-memory lead repository.

use crate::crm::domain::PersonId;
use crate::identity::{EmailAddress, PhoneKey, PhoneNumber};
use crate::lead::domain::{Lead, LeadDomainError, LeadId};
use crate::lead::ports::{LeadQuery, LeadRepository, LeadRepositoryError, LeadRepositoryResult};
use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct LeadState {
    leads: HashMap<LeadId, Lead>,
    email_index: HashMap<String, LeadId>,
    phone_index: HashMap<String, LeadId>,
}

/// Thread-safe in-memory lead repository.
#[derive(Debug, Clone)]
pub struct InMemoryLeadRepository<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    state: Arc<RwLock<LeadState>>,
    clock: Arc<C>,
}

impl InMemoryLeadRepository<DefaultClock> {
    /// Creates an empty repository on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for InMemoryLeadRepository<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> InMemoryLeadRepository<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty repository on the given clock.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(LeadState::default())),
            clock,
        }
    }

    fn write_state(&self) -> LeadRepositoryResult<std::sync::RwLockWriteGuard<'_, LeadState>> {
        self.state
            .write()
            .map_err(|err| LeadRepositoryError::persistence(std::io::Error::other(err.to_string())))
    }

    fn read_state(&self) -> LeadRepositoryResult<std::sync::RwLockReadGuard<'_, LeadState>> {
        self.state
            .read()
            .map_err(|err| LeadRepositoryError::persistence(std::io::Error::other(err.to_string())))
    }
}

fn sorted_by_age(mut leads: Vec<Lead>) -> Vec<Lead> {
    leads.sort_by_key(Lead::created_at);
    leads
}

fn matches_query(lead: &Lead, query: &LeadQuery, phone_key: Option<&PhoneKey>) -> bool {
    let email_hit = query
        .email
        .as_ref()
        .is_some_and(|email| lead.identity().email() == Some(email));
    let phone_hit =
        phone_key.is_some_and(|key| lead.identity().phone_key().as_ref() == Some(key));
    let name_hit = query.name.as_ref().is_some_and(|fragment| {
        let needle = fragment.to_lowercase();
        lead.name().first().to_lowercase().contains(&needle)
            || lead.name().last().to_lowercase().contains(&needle)
    });
    email_hit || phone_hit || name_hit
}

#[async_trait]
impl<C> LeadRepository for InMemoryLeadRepository<C>
where
    C: Clock + Send + Sync,
{
    async fn insert(&self, lead: &Lead) -> LeadRepositoryResult<()> {
        let mut state = self.write_state()?;
        if state.leads.contains_key(&lead.id()) {
            return Err(LeadRepositoryError::DuplicateLead(lead.id()));
        }

        let email_key = lead.identity().email().map(|email| email.as_str().to_owned());
        if let Some(key) = &email_key {
            if state.email_index.contains_key(key) {
                return Err(LeadRepositoryError::DuplicateIdentity(key.clone()));
            }
        }
        let phone_key = lead.identity().phone_key();
        if let Some(key) = &phone_key {
            if state.phone_index.contains_key(key.as_str()) {
                return Err(LeadRepositoryError::DuplicateIdentity(
                    key.as_str().to_owned(),
                ));
            }
        }

        if let Some(key) = email_key {
            state.email_index.insert(key, lead.id());
        }
        if let Some(key) = phone_key {
            state.phone_index.insert(key.as_str().to_owned(), lead.id());
        }
        state.leads.insert(lead.id(), lead.clone());
        Ok(())
    }

    async fn mark_synced(&self, id: LeadId, person: &PersonId) -> LeadRepositoryResult<()> {
        let mut state = self.write_state()?;
        let lead = state
            .leads
            .get_mut(&id)
            .ok_or(LeadRepositoryError::NotFound(id))?;
        lead.link_crm(person.clone(), &*self.clock)
            .map_err(|LeadDomainError::CrmLinkConflict(lead_id)| {
                LeadRepositoryError::LinkConflict(lead_id)
            })
    }

    async fn find_unsynced(&self) -> LeadRepositoryResult<Vec<Lead>> {
        let state = self.read_state()?;
        let unsynced = state
            .leads
            .values()
            .filter(|lead| !lead.is_synced())
            .cloned()
            .collect();
        Ok(sorted_by_age(unsynced))
    }

    async fn find_by_id(&self, id: LeadId) -> LeadRepositoryResult<Option<Lead>> {
        let state = self.read_state()?;
        Ok(state.leads.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> LeadRepositoryResult<Option<LeadId>> {
        let state = self.read_state()?;
        Ok(state.email_index.get(email.as_str()).copied())
    }

    async fn find_by_phone(&self, key: &PhoneKey) -> LeadRepositoryResult<Option<LeadId>> {
        let state = self.read_state()?;
        Ok(state.phone_index.get(key.as_str()).copied())
    }

    async fn search(&self, query: &LeadQuery) -> LeadRepositoryResult<Vec<Lead>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let state = self.read_state()?;
        let phone_key = query.phone.as_ref().and_then(PhoneNumber::match_key);
        let matched = state
            .leads
            .values()
            .filter(|lead| matches_query(lead, query, phone_key.as_ref()))
            .cloned()
            .collect();
        Ok(sorted_by_age(matched))
    }
}
