//! Reqwest-backed CRM client over the REST surface.

use super::wire::{
    MembersEnvelope, NewTaskWire, PeopleEnvelope, PersonUpsertWire, PersonWire,
    TaskBodyWire, TaskCreatedEnvelope, TasksEnvelope,
};
use crate::crm::domain::{
    CrmTaskId, FollowUpTask, MemberId, NewFollowUpTask, Person, PersonId, PersonUpsert,
    WorkspaceMember,
};
use crate::crm::ports::{CrmClient, CrmClientError, CrmClientResult, UpsertOutcome};
use crate::identity::{EmailAddress, PhoneKey};
use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Fixed per-call network timeout in seconds.
const CALL_TIMEOUT_SECS: u64 = 10;

/// Upsert header asking the CRM to merge duplicates and return the merged
/// record when it supports doing so.
const UPSERT_PREFER: &str = "resolution=merge-duplicates,return=representation";

/// CRM client speaking the REST binding.
#[derive(Debug, Clone)]
pub struct RestCrmClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl RestCrmClient {
    /// Creates a client for the given REST base URL and bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`CrmClientError::Transport`] when the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> CrmClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(CALL_TIMEOUT_SECS))
            .build()
            .map_err(CrmClientError::transport)?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            token: token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> CrmClientResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(CrmClientError::transport)?;
        let checked = check_status(response).await?;
        checked
            .json()
            .await
            .map_err(|err| CrmClientError::MalformedResponse(err.to_string()))
    }

    async fn find_person(&self, filter: &str, value: &str) -> CrmClientResult<Option<PersonId>> {
        let envelope: PeopleEnvelope = self.get_json("/people", &[(filter, value)]).await?;
        Ok(envelope
            .data
            .people
            .into_iter()
            .next()
            .map(|person| PersonId::new(person.id)))
    }
}

/// Maps a non-success response into the error taxonomy.
async fn check_status(response: Response) -> CrmClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    if status == StatusCode::CONFLICT {
        return Err(CrmClientError::Conflict(message));
    }
    Err(CrmClientError::Upstream {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl CrmClient for RestCrmClient {
    async fn find_person_by_email(
        &self,
        email: &EmailAddress,
    ) -> CrmClientResult<Option<PersonId>> {
        self.find_person("filter[emails.primaryEmail]", email.as_str())
            .await
    }

    async fn find_person_by_phone(&self, key: &PhoneKey) -> CrmClientResult<Option<PersonId>> {
        self.find_person("filter[phones.primaryPhoneNumber]", key.as_str())
            .await
    }

    async fn upsert_person(&self, payload: &PersonUpsert) -> CrmClientResult<UpsertOutcome> {
        let body = PersonUpsertWire::from(payload);
        let response = self
            .http
            .post(self.url("/people"))
            .query(&[("upsert", "true")])
            .header("Prefer", UPSERT_PREFER)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(CrmClientError::transport)?;
        let checked = check_status(response).await?;

        // Two response shapes are in the contract: the merged record list,
        // or a bare acknowledgement that forces a read-back by email.
        let raw = checked
            .text()
            .await
            .map_err(CrmClientError::transport)?;
        let records: Option<Vec<PersonWire>> = serde_json::from_str(&raw).ok();
        let resolved = records
            .and_then(|people| people.into_iter().next())
            .map(|person| PersonId::new(person.id));
        Ok(resolved.map_or(UpsertOutcome::Acknowledged, UpsertOutcome::Resolved))
    }

    async fn list_members(&self) -> CrmClientResult<Vec<WorkspaceMember>> {
        let envelope: MembersEnvelope = self.get_json("/workspaceMembers", &[]).await?;
        Ok(envelope
            .data
            .workspace_members
            .into_iter()
            .map(super::wire::MemberWire::into_member)
            .collect())
    }

    async fn count_open_tasks(&self, member: &MemberId) -> CrmClientResult<u64> {
        let envelope: TasksEnvelope = self
            .get_json(
                "/tasks",
                &[
                    ("filter[assigneeId]", member.as_str()),
                    ("filter[status]", "TODO"),
                ],
            )
            .await?;
        envelope.total_count.ok_or_else(|| {
            CrmClientError::MalformedResponse("task count response missing totalCount".to_owned())
        })
    }

    async fn list_people(&self) -> CrmClientResult<Vec<Person>> {
        let envelope: PeopleEnvelope = self.get_json("/people", &[]).await?;
        Ok(envelope
            .data
            .people
            .into_iter()
            .map(PersonWire::into_person)
            .collect())
    }

    async fn list_open_tasks(&self) -> CrmClientResult<Vec<FollowUpTask>> {
        let envelope: TasksEnvelope = self
            .get_json("/tasks", &[("filter[status]", "TODO")])
            .await?;
        let data = envelope.data.ok_or_else(|| {
            CrmClientError::MalformedResponse("task listing response missing data".to_owned())
        })?;
        data.tasks
            .into_iter()
            .map(super::wire::TaskWire::into_task)
            .collect()
    }

    async fn create_task(&self, task: &NewFollowUpTask) -> CrmClientResult<CrmTaskId> {
        let body = NewTaskWire {
            title: task.title().to_owned(),
            status: task.status().as_str().to_owned(),
            assignee_id: task.assignee().as_str().to_owned(),
            body_v2: TaskBodyWire {
                markdown: task.body().to_owned(),
            },
        };
        let response = self
            .http
            .post(self.url("/tasks"))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(CrmClientError::transport)?;
        let checked = check_status(response).await?;
        let envelope: TaskCreatedEnvelope = checked
            .json()
            .await
            .map_err(|err| CrmClientError::MalformedResponse(err.to_string()))?;
        Ok(CrmTaskId::new(envelope.data.task.id))
    }
}
