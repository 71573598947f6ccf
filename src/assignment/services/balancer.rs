//! Least-loaded follow-up assignment over CRM people and members.

use crate::assignment::ports::{ComposeError, FollowUpComposer, TieBreak};
use crate::crm::domain::{
    CrmTaskId, MemberId, NewFollowUpTask, Person, PersonId, WorkspaceMember, follow_up_title,
};
use crate::crm::ports::{CrmClient, CrmClientError};
use serde::Serialize;
use serde::ser::SerializeStruct;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Per-person failures collected while assigning follow-ups.
#[derive(Debug, Error)]
pub enum AssignmentItemError {
    /// A CRM call for this person failed.
    #[error(transparent)]
    Crm(#[from] CrmClientError),

    /// The body composer failed.
    #[error(transparent)]
    Compose(#[from] ComposeError),

    /// No member survived candidate selection.
    #[error("no members were available for assignment")]
    NoAssignableMembers,
}

/// Record of one created follow-up task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentRecord {
    /// Person the follow-up covers.
    pub person: PersonId,
    /// Member the task was assigned to.
    pub member: MemberId,
    /// Created task identifier.
    pub task: CrmTaskId,
}

/// Failure detail naming the person that could not be covered.
#[derive(Debug)]
pub struct AssignmentFailure {
    /// Person that failed.
    pub person: PersonId,
    /// Why the assignment failed.
    pub error: AssignmentItemError,
}

impl Serialize for AssignmentFailure {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AssignmentFailure", 2)?;
        state.serialize_field("person", &self.person)?;
        state.serialize_field("error", &self.error.to_string())?;
        state.end()
    }
}

/// Outcome of one balancing run.
#[derive(Debug, Default)]
pub struct AssignmentReport {
    created: Vec<AssignmentRecord>,
    failed: Vec<AssignmentFailure>,
}

impl AssignmentReport {
    /// Tasks created this run.
    #[must_use]
    pub fn created(&self) -> &[AssignmentRecord] {
        &self.created
    }

    /// People that could not be covered, with per-item detail.
    #[must_use]
    pub fn failed(&self) -> &[AssignmentFailure] {
        &self.failed
    }

    /// Number of tasks created this run.
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    /// Number of people that failed this run.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

impl Serialize for AssignmentReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AssignmentReport", 4)?;
        state.serialize_field("created_count", &self.created_count())?;
        state.serialize_field("failed_count", &self.failed_count())?;
        state.serialize_field("created", &self.created)?;
        state.serialize_field("failed", &self.failed)?;
        state.end()
    }
}

/// Run-level errors for follow-up balancing.
#[derive(Debug, Error)]
pub enum AssignmentError {
    /// No workspace members exist; nothing can own a follow-up.
    #[error("no workspace members exist to assign follow-ups to")]
    NoMembers,

    /// A bulk read (members, people, or open tasks) failed.
    #[error(transparent)]
    Crm(#[from] CrmClientError),
}

/// Follow-up balancing service.
#[derive(Clone)]
pub struct AssignmentService<C, T, B>
where
    C: CrmClient,
    T: TieBreak,
    B: FollowUpComposer,
{
    crm: Arc<C>,
    tie_break: Arc<T>,
    composer: Arc<B>,
}

impl<C, T, B> AssignmentService<C, T, B>
where
    C: CrmClient,
    T: TieBreak,
    B: FollowUpComposer,
{
    /// Creates a new balancing service.
    #[must_use]
    pub const fn new(crm: Arc<C>, tie_break: Arc<T>, composer: Arc<B>) -> Self {
        Self {
            crm,
            tie_break,
            composer,
        }
    }

    /// Creates a follow-up task for every person who lacks one.
    ///
    /// Eligibility is computed from two bulk reads ("list all, diff
    /// locally") rather than one filtered query per person. Member loads
    /// are re-counted for every person, so a task created for one person
    /// immediately weighs on the next pick; no counts are cached across
    /// people within the run.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::NoMembers`] before any per-person work
    /// when the workspace has no members, or [`AssignmentError::Crm`] when
    /// a bulk read fails. Per-person failures are collected in the report
    /// instead.
    pub async fn auto_assign(&self) -> Result<AssignmentReport, AssignmentError> {
        let members = self.crm.list_members().await?;
        if members.is_empty() {
            return Err(AssignmentError::NoMembers);
        }

        let people = self.crm.list_people().await?;
        let open_titles: HashSet<String> = self
            .crm
            .list_open_tasks()
            .await?
            .iter()
            .map(|task| task.title().to_owned())
            .collect();
        tracing::info!(
            members = members.len(),
            people = people.len(),
            open_tasks = open_titles.len(),
            "starting follow-up balancing run"
        );

        let mut report = AssignmentReport::default();
        for person in people {
            let title = follow_up_title(person.name());
            if open_titles.contains(&title) {
                continue;
            }
            match self.assign_one(&person, &title, &members).await {
                Ok(record) => {
                    tracing::info!(person = %record.person, member = %record.member, "follow-up created");
                    report.created.push(record);
                }
                Err(error) => {
                    tracing::warn!(person = %person.id(), error = %error, "follow-up assignment failed");
                    report.failed.push(AssignmentFailure {
                        person: person.id().clone(),
                        error,
                    });
                }
            }
        }
        Ok(report)
    }

    async fn assign_one(
        &self,
        person: &Person,
        title: &str,
        members: &[WorkspaceMember],
    ) -> Result<AssignmentRecord, AssignmentItemError> {
        let mut loads = Vec::with_capacity(members.len());
        for member in members {
            let count = self.crm.count_open_tasks(member.id()).await?;
            loads.push((member, count));
        }

        let minimum = loads
            .iter()
            .map(|(_, count)| *count)
            .min()
            .ok_or(AssignmentItemError::NoAssignableMembers)?;
        let candidates: Vec<&WorkspaceMember> = loads
            .iter()
            .filter(|(_, count)| *count == minimum)
            .map(|(member, _)| *member)
            .collect();
        let index = self.tie_break.pick(candidates.len());
        let chosen = candidates
            .get(index)
            .copied()
            .ok_or(AssignmentItemError::NoAssignableMembers)?;

        let body = self.composer.compose(person)?;
        let request = NewFollowUpTask::new(title, body, chosen.id().clone());
        let task = self.crm.create_task(&request).await?;
        Ok(AssignmentRecord {
            person: person.id().clone(),
            member: chosen.id().clone(),
            task,
        })
    }
}
