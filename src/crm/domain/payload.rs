//! Optional-field builder for the idempotent person upsert payload.

use crate::identity::{EmailAddress, PhoneKey};

/// Person upsert payload sent to the CRM.
///
/// Email is the only required field. Every other field is added through a
/// builder method whose absence or rejection is a no-op: in particular a
/// credit hint that does not parse as a number is dropped silently, never
/// raised.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonUpsert {
    email: EmailAddress,
    first_name: String,
    last_name: String,
    phone: Option<PhoneKey>,
    job_title: Option<String>,
    budget: Option<f64>,
}

impl PersonUpsert {
    /// Calling code attached to every phone key sent to the CRM.
    pub const PHONE_CALLING_CODE: &'static str = "+1";

    /// Country code attached to every phone key sent to the CRM.
    pub const PHONE_COUNTRY_CODE: &'static str = "CA";

    /// Creates a payload for the given (already normalised) email.
    #[must_use]
    pub const fn new(email: EmailAddress) -> Self {
        Self {
            email,
            first_name: String::new(),
            last_name: String::new(),
            phone: None,
            job_title: None,
            budget: None,
        }
    }

    /// Sets the name fields, trimmed. Whitespace-only parts stay empty.
    #[must_use]
    pub fn with_name(mut self, first: &str, last: &str) -> Self {
        self.first_name = first.trim().to_owned();
        self.last_name = last.trim().to_owned();
        self
    }

    /// Sets the phone match key.
    #[must_use]
    pub fn with_phone(mut self, phone: PhoneKey) -> Self {
        self.phone = Some(phone);
        self
    }

    /// Sets the job title unless it is blank after trimming.
    #[must_use]
    pub fn with_job_title(mut self, job_title: &str) -> Self {
        let trimmed = job_title.trim();
        if !trimmed.is_empty() {
            self.job_title = Some(trimmed.to_owned());
        }
        self
    }

    /// Parses a credit hint into the numeric budget field.
    ///
    /// A hint that does not parse as a number is dropped without error.
    #[must_use]
    pub fn with_budget_hint(mut self, hint: &str) -> Self {
        if let Ok(budget) = hint.trim().parse::<f64>() {
            self.budget = Some(budget);
        }
        self
    }

    /// Returns the required email.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the trimmed first name, possibly empty.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the trimmed last name, possibly empty.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Whether either name part is present.
    #[must_use]
    pub fn has_name(&self) -> bool {
        !self.first_name.is_empty() || !self.last_name.is_empty()
    }

    /// Returns the phone key, if set.
    #[must_use]
    pub const fn phone(&self) -> Option<&PhoneKey> {
        self.phone.as_ref()
    }

    /// Returns the job title, if set.
    #[must_use]
    pub fn job_title(&self) -> Option<&str> {
        self.job_title.as_deref()
    }

    /// Returns the parsed budget, if the hint was numeric.
    #[must_use]
    pub const fn budget(&self) -> Option<f64> {
        self.budget
    }
}
