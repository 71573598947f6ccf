//! Email-then-phone identity resolution.

use super::{ContactDirectory, ContactIdentity, DirectoryResult};

/// Resolves a contact identity against a directory.
///
/// Email is the higher-confidence signal: when an email is present and
/// matches, the phone is not consulted at all. The phone lookup uses the
/// last-ten-digit match key, so formatting and country-code variance do not
/// defeat it. A total miss returns `Ok(None)`: the record should be
/// created, so a miss is not an error.
///
/// # Errors
///
/// Returns [`super::DirectoryError`] when the backing store fails to answer
/// a lookup.
pub async fn resolve_identity<D>(
    directory: &D,
    identity: &ContactIdentity,
) -> DirectoryResult<Option<D::Id>>
where
    D: ContactDirectory + ?Sized,
{
    if let Some(email) = identity.email() {
        if let Some(found) = directory.find_by_email(email).await? {
            return Ok(Some(found));
        }
    }

    if let Some(key) = identity.phone_key() {
        if let Some(found) = directory.find_by_phone(&key).await? {
            return Ok(Some(found));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::resolve_identity;
    use crate::identity::{
        ContactDirectory, ContactIdentity, DirectoryResult, EmailAddress, PhoneKey, PhoneNumber,
    };
    use async_trait::async_trait;
    use std::collections::HashMap;

    #[derive(Default)]
    struct StubDirectory {
        by_email: HashMap<String, u32>,
        by_phone: HashMap<String, u32>,
    }

    #[async_trait]
    impl ContactDirectory for StubDirectory {
        type Id = u32;

        async fn find_by_email(&self, email: &EmailAddress) -> DirectoryResult<Option<u32>> {
            Ok(self.by_email.get(email.as_str()).copied())
        }

        async fn find_by_phone(&self, key: &PhoneKey) -> DirectoryResult<Option<u32>> {
            Ok(self.by_phone.get(key.as_str()).copied())
        }
    }

    fn identity(email: Option<&str>, phone: Option<&str>) -> ContactIdentity {
        let email = email.map(|value| EmailAddress::new(value).expect("valid email"));
        let phone = phone.map(|value| PhoneNumber::new(value).expect("valid phone"));
        ContactIdentity::new(email, phone).expect("valid identity")
    }

    #[tokio::test]
    async fn email_match_wins_over_conflicting_phone() {
        let mut directory = StubDirectory::default();
        directory.by_email.insert("jane@example.com".to_owned(), 1);
        directory.by_phone.insert("5551234567".to_owned(), 2);

        let resolved = resolve_identity(
            &directory,
            &identity(Some("jane@example.com"), Some("+1 (555) 123-4567")),
        )
        .await
        .expect("lookup should succeed");

        assert_eq!(resolved, Some(1));
    }

    #[tokio::test]
    async fn phone_fallback_matches_on_last_ten_digits() {
        let mut directory = StubDirectory::default();
        directory.by_phone.insert("5551234567".to_owned(), 7);

        let resolved = resolve_identity(
            &directory,
            &identity(Some("unknown@example.com"), Some("+1 (555) 123-4567")),
        )
        .await
        .expect("lookup should succeed");

        assert_eq!(resolved, Some(7));
    }

    #[tokio::test]
    async fn total_miss_resolves_to_none() {
        let directory = StubDirectory::default();
        let resolved = resolve_identity(&directory, &identity(Some("new@example.com"), None))
            .await
            .expect("lookup should succeed");
        assert_eq!(resolved, None);
    }

    #[tokio::test]
    async fn short_phone_is_never_matched() {
        let mut directory = StubDirectory::default();
        directory.by_phone.insert("5551234567".to_owned(), 7);

        let resolved = resolve_identity(&directory, &identity(None, Some("555-1234")))
            .await
            .expect("lookup should succeed");

        assert_eq!(resolved, None);
    }
}
