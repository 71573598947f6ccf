//! Thread-safe in-memory CRM client.
//!
//! Behaves like the real CRM's observable contract: upserts merge on email,
//! task counts follow assignment, and identifiers are minted sequentially.
//! Failure knobs let tests arm duplicate-create conflicts, acknowledgement-
//! only upsert responses, and per-title task-creation failures.

use crate::crm::domain::{
    CrmTaskId, FollowUpTask, MemberId, NewFollowUpTask, Person, PersonId, PersonName,
    PersonUpsert, TaskStatus, WorkspaceMember,
};
use crate::crm::ports::{CrmClient, CrmClientError, CrmClientResult, UpsertOutcome};
use crate::identity::{EmailAddress, PhoneKey};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug)]
struct PersonRecord {
    person: Person,
    phone_key: Option<PhoneKey>,
}

impl PersonRecord {
    fn matches_email(&self, email: &EmailAddress) -> bool {
        self.person.email().is_some_and(|stored| stored == email)
    }
}

#[derive(Debug, Default)]
struct CrmState {
    people: Vec<PersonRecord>,
    members: Vec<WorkspaceMember>,
    tasks: Vec<FollowUpTask>,
    next_person: u64,
    next_task: u64,
    acknowledge_upserts: bool,
    conflicts_remaining: u32,
    failing_task_titles: HashSet<String>,
}

/// Thread-safe in-memory CRM client.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCrm {
    state: Arc<RwLock<CrmState>>,
}

impl InMemoryCrm {
    /// Creates an empty in-memory CRM.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn write_state(&self) -> CrmClientResult<RwLockWriteGuard<'_, CrmState>> {
        self.state
            .write()
            .map_err(|err| CrmClientError::transport(std::io::Error::other(err.to_string())))
    }

    fn read_state(&self) -> CrmClientResult<RwLockReadGuard<'_, CrmState>> {
        self.state
            .read()
            .map_err(|err| CrmClientError::transport(std::io::Error::other(err.to_string())))
    }

    fn setup_state(&self) -> RwLockWriteGuard<'_, CrmState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a workspace member.
    pub fn add_member(&self, member: WorkspaceMember) {
        self.setup_state().members.push(member);
    }

    /// Seeds a person record directly, bypassing the upsert path.
    ///
    /// Returns the minted identifier so callers can assert against it.
    #[must_use]
    pub fn seed_person(
        &self,
        name: PersonName,
        email: Option<EmailAddress>,
        phone_key: Option<PhoneKey>,
    ) -> PersonId {
        let mut state = self.setup_state();
        let id = mint_person_id(&mut state);
        let mut person = Person::new(id.clone(), name);
        if let Some(address) = email {
            person = person.with_email(address);
        }
        state.people.push(PersonRecord { person, phone_key });
        id
    }

    /// Seeds an existing follow-up task, bypassing the create path.
    pub fn seed_task(
        &self,
        title: impl Into<String>,
        status: TaskStatus,
        assignee: Option<MemberId>,
    ) {
        let mut state = self.setup_state();
        let id = mint_task_id(&mut state);
        state
            .tasks
            .push(FollowUpTask::new(id, title, status, assignee));
    }

    /// Makes upserts return [`UpsertOutcome::Acknowledged`] instead of the
    /// merged record, forcing callers onto the read-back path.
    pub fn acknowledge_upserts(&self) {
        self.setup_state().acknowledge_upserts = true;
    }

    /// Arms the next `count` upserts to fail with a duplicate-create
    /// conflict before touching state.
    pub fn fail_upserts_with_conflict(&self, count: u32) {
        self.setup_state().conflicts_remaining = count;
    }

    /// Makes task creation fail for the given title.
    pub fn fail_task_creation_for(&self, title: impl Into<String>) {
        self.setup_state().failing_task_titles.insert(title.into());
    }

    /// Returns the number of person records currently stored.
    #[must_use]
    pub fn person_count(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .people
            .len()
    }

    /// Returns every stored task regardless of status.
    #[must_use]
    pub fn all_tasks(&self) -> Vec<FollowUpTask> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .tasks
            .clone()
    }
}

fn mint_person_id(state: &mut CrmState) -> PersonId {
    state.next_person += 1;
    PersonId::new(format!("person-{}", state.next_person))
}

fn mint_task_id(state: &mut CrmState) -> CrmTaskId {
    state.next_task += 1;
    CrmTaskId::new(format!("task-{}", state.next_task))
}

fn merge_payload(record: &mut PersonRecord, payload: &PersonUpsert) {
    if payload.has_name() {
        let city = record.person.city().map(ToOwned::to_owned);
        let mut merged = Person::new(
            record.person.id().clone(),
            PersonName::new(payload.first_name(), payload.last_name()),
        )
        .with_email(payload.email().clone());
        if let Some(value) = city {
            merged = merged.with_city(value);
        }
        record.person = merged;
    }
    if let Some(key) = payload.phone() {
        record.phone_key = Some(key.clone());
    }
}

#[async_trait]
impl CrmClient for InMemoryCrm {
    async fn find_person_by_email(
        &self,
        email: &EmailAddress,
    ) -> CrmClientResult<Option<PersonId>> {
        let state = self.read_state()?;
        Ok(state
            .people
            .iter()
            .find(|record| record.matches_email(email))
            .map(|record| record.person.id().clone()))
    }

    async fn find_person_by_phone(&self, key: &PhoneKey) -> CrmClientResult<Option<PersonId>> {
        let state = self.read_state()?;
        Ok(state
            .people
            .iter()
            .find(|record| record.phone_key.as_ref() == Some(key))
            .map(|record| record.person.id().clone()))
    }

    async fn upsert_person(&self, payload: &PersonUpsert) -> CrmClientResult<UpsertOutcome> {
        let mut state = self.write_state()?;
        if state.conflicts_remaining > 0 {
            state.conflicts_remaining -= 1;
            return Err(CrmClientError::Conflict(format!(
                "person {} already being created",
                payload.email()
            )));
        }

        let existing_id = state
            .people
            .iter()
            .find(|record| record.matches_email(payload.email()))
            .map(|record| record.person.id().clone());

        let id = match existing_id {
            Some(found) => {
                if let Some(record) = state
                    .people
                    .iter_mut()
                    .find(|record| record.person.id() == &found)
                {
                    merge_payload(record, payload);
                }
                found
            }
            None => {
                let id = mint_person_id(&mut state);
                let person = Person::new(
                    id.clone(),
                    PersonName::new(payload.first_name(), payload.last_name()),
                )
                .with_email(payload.email().clone());
                state.people.push(PersonRecord {
                    person,
                    phone_key: payload.phone().cloned(),
                });
                id
            }
        };

        if state.acknowledge_upserts {
            return Ok(UpsertOutcome::Acknowledged);
        }
        Ok(UpsertOutcome::Resolved(id))
    }

    async fn list_members(&self) -> CrmClientResult<Vec<WorkspaceMember>> {
        let state = self.read_state()?;
        Ok(state.members.clone())
    }

    async fn count_open_tasks(&self, member: &MemberId) -> CrmClientResult<u64> {
        let state = self.read_state()?;
        let count = state
            .tasks
            .iter()
            .filter(|task| task.status().is_open() && task.assignee() == Some(member))
            .count();
        Ok(count.try_into().unwrap_or(u64::MAX))
    }

    async fn list_people(&self) -> CrmClientResult<Vec<Person>> {
        let state = self.read_state()?;
        Ok(state
            .people
            .iter()
            .map(|record| record.person.clone())
            .collect())
    }

    async fn list_open_tasks(&self) -> CrmClientResult<Vec<FollowUpTask>> {
        let state = self.read_state()?;
        Ok(state
            .tasks
            .iter()
            .filter(|task| task.status().is_open())
            .cloned()
            .collect())
    }

    async fn create_task(&self, task: &NewFollowUpTask) -> CrmClientResult<CrmTaskId> {
        let mut state = self.write_state()?;
        if state.failing_task_titles.contains(task.title()) {
            return Err(CrmClientError::Upstream {
                status: 500,
                message: format!("task creation rejected: {}", task.title()),
            });
        }
        let id = mint_task_id(&mut state);
        state.tasks.push(FollowUpTask::new(
            id.clone(),
            task.title(),
            task.status(),
            Some(task.assignee().clone()),
        ));
        Ok(id)
    }
}
