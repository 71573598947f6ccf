//! Workspace members eligible to own follow-up tasks.

use super::MemberId;
use crate::identity::EmailAddress;
use serde::{Deserialize, Serialize};

/// Human agent registered in the CRM workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceMember {
    id: MemberId,
    email: Option<EmailAddress>,
}

impl WorkspaceMember {
    /// Creates a member as observed from the CRM.
    #[must_use]
    pub const fn new(id: MemberId) -> Self {
        Self { id, email: None }
    }

    /// Sets the member's contact email, used for reporting.
    #[must_use]
    pub fn with_email(mut self, email: EmailAddress) -> Self {
        self.email = Some(email);
        self
    }

    /// Returns the member identifier.
    #[must_use]
    pub const fn id(&self) -> &MemberId {
        &self.id
    }

    /// Returns the member's contact email, if known.
    #[must_use]
    pub const fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }
}
