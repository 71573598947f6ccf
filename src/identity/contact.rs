//! Validated contact value types used to match records across systems.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of trailing digits that form a phone match key.
const PHONE_KEY_LEN: usize = 10;

/// Errors returned while constructing contact identity values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The email address is not a plausible `local@domain` value.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// The phone number is empty after trimming.
    #[error("phone number must not be empty")]
    EmptyPhone,

    /// Neither an email nor a phone number was supplied.
    #[error("contact identity requires an email or a phone number")]
    MissingContactPoint,
}

/// Email address, trimmed and lowercased at construction.
///
/// Normalising here makes every downstream comparison case-insensitive
/// without each collaborator having to remember to fold case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidEmail`] if the value does not contain
    /// exactly one `@` with a non-empty local part and domain.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityError> {
        let raw = value.into();
        let normalized = raw.trim().to_lowercase();
        let mut segments = normalized.split('@');
        let local = segments.next().unwrap_or_default();
        let domain = segments.next().unwrap_or_default();
        let has_more_segments = segments.next().is_some();
        let is_valid = !local.is_empty() && !domain.is_empty() && !has_more_segments;

        if !is_valid {
            return Err(IdentityError::InvalidEmail(raw));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalised address as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Phone number as supplied by the caller.
///
/// The raw value is retained for display; matching goes through
/// [`PhoneNumber::match_key`], which tolerates country-code and formatting
/// variance by comparing only the last ten digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Creates a phone number from a raw string.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::EmptyPhone`] if the value is empty after
    /// trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentityError::EmptyPhone);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the raw phone value as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives the last-ten-digit match key, if enough digits are present.
    #[must_use]
    pub fn match_key(&self) -> Option<PhoneKey> {
        let digits: Vec<char> = self.0.chars().filter(char::is_ascii_digit).collect();
        if digits.len() < PHONE_KEY_LEN {
            return None;
        }
        let key: String = digits
            .iter()
            .skip(digits.len() - PHONE_KEY_LEN)
            .collect();
        Some(PhoneKey(key))
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalised last-ten-digit phone match key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneKey(String);

impl PhoneKey {
    /// Returns the key digits as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The `(email, phone)` pair used to match records across systems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactIdentity {
    email: Option<EmailAddress>,
    phone: Option<PhoneNumber>,
}

impl ContactIdentity {
    /// Creates a contact identity with at least one contact point.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::MissingContactPoint`] when both fields are
    /// absent, since such an identity could never be resolved.
    pub fn new(
        email: Option<EmailAddress>,
        phone: Option<PhoneNumber>,
    ) -> Result<Self, IdentityError> {
        if email.is_none() && phone.is_none() {
            return Err(IdentityError::MissingContactPoint);
        }
        Ok(Self { email, phone })
    }

    /// Returns the email, if present.
    #[must_use]
    pub const fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }

    /// Returns the phone number, if present.
    #[must_use]
    pub const fn phone(&self) -> Option<&PhoneNumber> {
        self.phone.as_ref()
    }

    /// Derives the phone match key, if a phone with enough digits is present.
    #[must_use]
    pub fn phone_key(&self) -> Option<PhoneKey> {
        self.phone.as_ref().and_then(PhoneNumber::match_key)
    }
}

#[cfg(test)]
mod tests {
    use super::{ContactIdentity, EmailAddress, IdentityError, PhoneNumber};

    #[test]
    fn email_is_trimmed_and_lowercased() {
        let email = EmailAddress::new("  Jane.Doe@Example.COM ").expect("valid email");
        assert_eq!(email.as_str(), "jane.doe@example.com");
    }

    #[test]
    fn email_rejects_missing_domain() {
        assert_eq!(
            EmailAddress::new("jane@"),
            Err(IdentityError::InvalidEmail("jane@".to_owned()))
        );
    }

    #[test]
    fn email_rejects_multiple_at_signs() {
        assert!(EmailAddress::new("a@b@c").is_err());
    }

    #[test]
    fn phone_match_key_drops_formatting_and_country_code() {
        let formatted = PhoneNumber::new("+1 (555) 123-4567").expect("valid phone");
        let plain = PhoneNumber::new("5551234567").expect("valid phone");
        assert_eq!(formatted.match_key(), plain.match_key());
        assert_eq!(
            plain.match_key().expect("key present").as_str(),
            "5551234567"
        );
    }

    #[test]
    fn phone_match_key_requires_ten_digits() {
        let short = PhoneNumber::new("555-1234").expect("valid phone");
        assert!(short.match_key().is_none());
    }

    #[test]
    fn identity_requires_a_contact_point() {
        assert_eq!(
            ContactIdentity::new(None, None),
            Err(IdentityError::MissingContactPoint)
        );
    }
}
