//! CRM person records as observed through the client port.

use super::PersonId;
use crate::identity::EmailAddress;
use serde::{Deserialize, Serialize};

/// First/last name pair of a CRM person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    first: String,
    last: String,
}

impl PersonName {
    /// Creates a name pair, trimming both parts.
    #[must_use]
    pub fn new(first: &str, last: &str) -> Self {
        Self {
            first: first.trim().to_owned(),
            last: last.trim().to_owned(),
        }
    }

    /// Returns the trimmed first name.
    #[must_use]
    pub fn first(&self) -> &str {
        &self.first
    }

    /// Returns the trimmed last name.
    #[must_use]
    pub fn last(&self) -> &str {
        &self.last
    }

    /// Renders the display name used in follow-up titles and bodies.
    ///
    /// Empty parts are skipped so a single-part name does not carry a stray
    /// space.
    #[must_use]
    pub fn display(&self) -> String {
        let mut rendered = String::with_capacity(self.first.len() + self.last.len() + 1);
        rendered.push_str(&self.first);
        if !self.first.is_empty() && !self.last.is_empty() {
            rendered.push(' ');
        }
        rendered.push_str(&self.last);
        rendered
    }
}

/// Person record owned by the CRM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    id: PersonId,
    name: PersonName,
    email: Option<EmailAddress>,
    city: Option<String>,
}

impl Person {
    /// Creates a person as observed from the CRM.
    #[must_use]
    pub const fn new(id: PersonId, name: PersonName) -> Self {
        Self {
            id,
            name,
            email: None,
            city: None,
        }
    }

    /// Sets the primary email address.
    #[must_use]
    pub fn with_email(mut self, email: EmailAddress) -> Self {
        self.email = Some(email);
        self
    }

    /// Sets the city.
    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Returns the person identifier.
    #[must_use]
    pub const fn id(&self) -> &PersonId {
        &self.id
    }

    /// Returns the name.
    #[must_use]
    pub const fn name(&self) -> &PersonName {
        &self.name
    }

    /// Returns the primary email, if the CRM reported one.
    #[must_use]
    pub const fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }

    /// Returns the city, if the CRM reported one.
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }
}
