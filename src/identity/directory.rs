//! Directory port consulted during identity resolution.

use super::{EmailAddress, PhoneKey};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory lookups.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Lookup contract over a store that indexes records by contact identity.
///
/// Both the local lead store and the CRM implement this port through thin
/// wrappers, so the same resolver precedence runs against either backend.
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    /// Identifier type of the backing store's records.
    type Id: Send;

    /// Finds a record by its normalised email address.
    async fn find_by_email(&self, email: &EmailAddress) -> DirectoryResult<Option<Self::Id>>;

    /// Finds a record by its last-ten-digit phone key.
    async fn find_by_phone(&self, key: &PhoneKey) -> DirectoryResult<Option<Self::Id>>;
}

/// Errors returned by directory implementations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// The backing store failed to answer the lookup.
    #[error("directory lookup failed: {0}")]
    Lookup(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryError {
    /// Wraps a backing-store failure.
    pub fn lookup(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Lookup(Arc::new(err))
    }
}
