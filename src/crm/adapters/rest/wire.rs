//! Serde models for the CRM's REST wire format.

use crate::crm::domain::{
    CrmTaskId, FollowUpTask, MemberId, Person, PersonId, PersonName, PersonUpsert, TaskStatus,
    WorkspaceMember,
};
use crate::crm::ports::CrmClientError;
use crate::identity::EmailAddress;
use serde::{Deserialize, Serialize};

/// Name object shared by person reads and writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameWire {
    /// First name.
    #[serde(default)]
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: String,
}

/// Primary-email object shared by person reads and writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailsWire {
    /// Primary email address.
    #[serde(default)]
    pub primary_email: Option<String>,
}

/// Phone object carried on person writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhonesWire {
    /// Last-ten-digit phone number.
    pub primary_phone_number: String,
    /// Fixed calling code.
    pub primary_phone_calling_code: String,
    /// Fixed country code.
    pub primary_phone_country_code: String,
}

/// Person record as returned by the CRM.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonWire {
    /// CRM person identifier.
    pub id: String,
    /// Name object.
    #[serde(default)]
    pub name: Option<NameWire>,
    /// Email object.
    #[serde(default)]
    pub emails: Option<EmailsWire>,
    /// City attribute.
    #[serde(default)]
    pub city: Option<String>,
}

impl PersonWire {
    /// Converts the wire record into the domain person.
    ///
    /// An email the CRM holds in a shape we cannot parse is treated as
    /// absent rather than failing the whole listing.
    #[must_use]
    pub fn into_person(self) -> Person {
        let name = self
            .name
            .map_or_else(PersonName::default, |name| {
                PersonName::new(&name.first_name, &name.last_name)
            });
        let mut person = Person::new(PersonId::new(self.id), name);
        let email = self
            .emails
            .and_then(|emails| emails.primary_email)
            .and_then(|raw| EmailAddress::new(raw).ok());
        if let Some(address) = email {
            person = person.with_email(address);
        }
        if let Some(city) = self.city {
            person = person.with_city(city);
        }
        person
    }
}

/// Upsert request body for the people endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonUpsertWire {
    /// Name object, omitted when both parts are empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<NameWire>,
    /// Required primary email.
    pub emails: EmailsWire,
    /// Phone object, omitted when no match key is available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phones: Option<PhonesWire>,
    /// Job title, omitted when blank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    /// Numeric budget parsed from the credit hint, omitted on parse failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
}

impl From<&PersonUpsert> for PersonUpsertWire {
    fn from(payload: &PersonUpsert) -> Self {
        let name = payload.has_name().then(|| NameWire {
            first_name: payload.first_name().to_owned(),
            last_name: payload.last_name().to_owned(),
        });
        let phones = payload.phone().map(|key| PhonesWire {
            primary_phone_number: key.as_str().to_owned(),
            primary_phone_calling_code: PersonUpsert::PHONE_CALLING_CODE.to_owned(),
            primary_phone_country_code: PersonUpsert::PHONE_COUNTRY_CODE.to_owned(),
        });
        Self {
            name,
            emails: EmailsWire {
                primary_email: Some(payload.email().as_str().to_owned()),
            },
            phones,
            job_title: payload.job_title().map(ToOwned::to_owned),
            budget: payload.budget(),
        }
    }
}

/// Workspace member record as returned by the CRM.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberWire {
    /// CRM member identifier.
    pub id: String,
    /// Contact email, if the CRM reports one.
    #[serde(default)]
    pub user_email: Option<String>,
}

impl MemberWire {
    /// Converts the wire record into the domain member.
    #[must_use]
    pub fn into_member(self) -> WorkspaceMember {
        let mut member = WorkspaceMember::new(MemberId::new(self.id));
        let email = self
            .user_email
            .and_then(|raw| EmailAddress::new(raw).ok());
        if let Some(address) = email {
            member = member.with_email(address);
        }
        member
    }
}

/// Task record as returned by the CRM.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWire {
    /// CRM task identifier.
    pub id: String,
    /// Task title.
    #[serde(default)]
    pub title: String,
    /// Task status string.
    pub status: String,
    /// Assigned member, if any.
    #[serde(default)]
    pub assignee_id: Option<String>,
}

impl TaskWire {
    /// Converts the wire record into the domain task.
    ///
    /// # Errors
    ///
    /// Returns [`CrmClientError::MalformedResponse`] when the status string
    /// is not one the contract defines.
    pub fn into_task(self) -> Result<FollowUpTask, CrmClientError> {
        let status = TaskStatus::try_from(self.status.as_str())
            .map_err(|err| CrmClientError::MalformedResponse(err.to_string()))?;
        Ok(FollowUpTask::new(
            CrmTaskId::new(self.id),
            self.title,
            status,
            self.assignee_id.map(MemberId::new),
        ))
    }
}

/// Markdown body object for task creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskBodyWire {
    /// Markdown content.
    pub markdown: String,
}

/// Creation request body for the tasks endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTaskWire {
    /// Dedup-keyed title.
    pub title: String,
    /// Status the task is created with.
    pub status: String,
    /// Assigned member.
    pub assignee_id: String,
    /// Markdown body.
    pub body_v2: TaskBodyWire,
}

/// Envelope for people listings.
#[derive(Debug, Clone, Deserialize)]
pub struct PeopleEnvelope {
    /// Payload wrapper.
    pub data: PeopleData,
}

/// Payload of a people listing.
#[derive(Debug, Clone, Deserialize)]
pub struct PeopleData {
    /// Person records.
    pub people: Vec<PersonWire>,
}

/// Envelope for workspace member listings.
#[derive(Debug, Clone, Deserialize)]
pub struct MembersEnvelope {
    /// Payload wrapper.
    pub data: MembersData,
}

/// Payload of a member listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembersData {
    /// Member records.
    pub workspace_members: Vec<MemberWire>,
}

/// Envelope for task listings; `totalCount` serves the count queries.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksEnvelope {
    /// Payload wrapper, absent on pure count responses.
    #[serde(default)]
    pub data: Option<TasksData>,
    /// Total number of matching tasks.
    #[serde(default)]
    pub total_count: Option<u64>,
}

/// Payload of a task listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TasksData {
    /// Task records.
    pub tasks: Vec<TaskWire>,
}

/// Envelope for task creation.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskCreatedEnvelope {
    /// Payload wrapper.
    pub data: TaskCreatedData,
}

/// Payload of a task creation response.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskCreatedData {
    /// Created task record.
    pub task: CreatedTaskWire,
}

/// Created task record.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTaskWire {
    /// CRM task identifier.
    pub id: String,
}
