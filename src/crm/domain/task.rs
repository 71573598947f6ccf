//! Follow-up tasks and the title function used for duplicate suppression.

use super::{CrmTaskId, MemberId, PersonName};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title prefix shared by every generated follow-up task.
const FOLLOW_UP_TITLE_PREFIX: &str = "📞 Sales Follow-up — ";

/// Derives the follow-up task title for a person.
///
/// The title doubles as the dedup key: a person is considered covered when
/// an open task carries exactly this title. Two people sharing a display
/// name therefore collide, a known limitation kept for compatibility with
/// the CRM's existing task records.
#[must_use]
pub fn follow_up_title(name: &PersonName) -> String {
    format!("{FOLLOW_UP_TITLE_PREFIX}{}", name.display())
}

/// Follow-up task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task has not been started.
    Todo,
    /// Task is being worked.
    InProgress,
    /// Task has been completed.
    Done,
}

impl TaskStatus {
    /// Returns the canonical CRM representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Whether the status counts as an open follow-up.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Todo)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "TODO" => Ok(Self::Todo),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Error returned while parsing task statuses from the CRM.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Follow-up task record owned by the CRM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpTask {
    id: CrmTaskId,
    title: String,
    status: TaskStatus,
    assignee: Option<MemberId>,
}

impl FollowUpTask {
    /// Creates a task as observed from the CRM.
    #[must_use]
    pub fn new(
        id: CrmTaskId,
        title: impl Into<String>,
        status: TaskStatus,
        assignee: Option<MemberId>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            status,
            assignee,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &CrmTaskId {
        &self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the owning member, if assigned.
    #[must_use]
    pub const fn assignee(&self) -> Option<&MemberId> {
        self.assignee.as_ref()
    }
}

/// Creation request for a follow-up task.
///
/// The title must exactly match [`follow_up_title`] for the person, or the
/// next balancing run will fail to recognise the task and create a second
/// one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFollowUpTask {
    title: String,
    body: String,
    assignee: MemberId,
}

impl NewFollowUpTask {
    /// Creates a task request; the status is always open (`TODO`).
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>, assignee: MemberId) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            assignee,
        }
    }

    /// Returns the dedup-keyed title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the markdown body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the member the task is assigned to.
    #[must_use]
    pub const fn assignee(&self) -> &MemberId {
        &self.assignee
    }

    /// Returns the status every new follow-up is created with.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        TaskStatus::Todo
    }
}
