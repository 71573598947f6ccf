//! Contact-directory wrapper exposing the CRM to the identity resolver.

use crate::crm::domain::PersonId;
use crate::crm::ports::CrmClient;
use crate::identity::{ContactDirectory, DirectoryError, DirectoryResult, EmailAddress, PhoneKey};
use async_trait::async_trait;

/// Adapts a [`CrmClient`] to the [`ContactDirectory`] port so race recovery
/// can reuse the email-then-phone precedence against the CRM.
#[derive(Debug, Clone, Copy)]
pub struct CrmPersonDirectory<'a, C> {
    client: &'a C,
}

impl<'a, C> CrmPersonDirectory<'a, C>
where
    C: CrmClient,
{
    /// Wraps a CRM client.
    #[must_use]
    pub const fn new(client: &'a C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C> ContactDirectory for CrmPersonDirectory<'_, C>
where
    C: CrmClient,
{
    type Id = PersonId;

    async fn find_by_email(&self, email: &EmailAddress) -> DirectoryResult<Option<PersonId>> {
        self.client
            .find_person_by_email(email)
            .await
            .map_err(DirectoryError::lookup)
    }

    async fn find_by_phone(&self, key: &PhoneKey) -> DirectoryResult<Option<PersonId>> {
        self.client
            .find_person_by_phone(key)
            .await
            .map_err(DirectoryError::lookup)
    }
}
