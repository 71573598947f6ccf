//! Contact-directory wrapper exposing the lead store to the identity
//! resolver.

use crate::identity::{ContactDirectory, DirectoryError, DirectoryResult, EmailAddress, PhoneKey};
use crate::lead::domain::LeadId;
use crate::lead::ports::LeadRepository;
use async_trait::async_trait;

/// Adapts a [`LeadRepository`] to the [`ContactDirectory`] port so intake
/// dedup reuses the email-then-phone precedence against the local store.
#[derive(Debug, Clone, Copy)]
pub struct LeadStoreDirectory<'a, R> {
    repository: &'a R,
}

impl<'a, R> LeadStoreDirectory<'a, R>
where
    R: LeadRepository,
{
    /// Wraps a lead repository.
    #[must_use]
    pub const fn new(repository: &'a R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> ContactDirectory for LeadStoreDirectory<'_, R>
where
    R: LeadRepository,
{
    type Id = LeadId;

    async fn find_by_email(&self, email: &EmailAddress) -> DirectoryResult<Option<LeadId>> {
        self.repository
            .find_by_email(email)
            .await
            .map_err(DirectoryError::lookup)
    }

    async fn find_by_phone(&self, key: &PhoneKey) -> DirectoryResult<Option<LeadId>> {
        self.repository
            .find_by_phone(key)
            .await
            .map_err(DirectoryError::lookup)
    }
}
