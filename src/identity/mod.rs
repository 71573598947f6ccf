//! Contact identity resolution shared by the lead store and the CRM.
//!
//! A record in either system is addressed by the same `(email, phone)` pair.
//! This module owns the validated contact value types, the
//! [`ContactDirectory`] port implemented by each backing store, and the
//! resolver that applies the email-then-phone precedence order.

mod contact;
mod directory;
mod resolver;

pub use contact::{ContactIdentity, EmailAddress, IdentityError, PhoneKey, PhoneNumber};
pub use directory::{ContactDirectory, DirectoryError, DirectoryResult};
pub use resolver::resolve_identity;
