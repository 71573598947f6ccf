//! Body composition port for follow-up tasks.

use crate::crm::domain::Person;
use thiserror::Error;

/// Produces the markdown body attached to a new follow-up task.
///
/// The balancer only requires that a non-empty body is available
/// synchronously before task creation; how the content is produced is the
/// adapter's concern.
pub trait FollowUpComposer: Send + Sync {
    /// Renders the body for the given person.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError`] when rendering fails.
    fn compose(&self, person: &Person) -> Result<String, ComposeError>;
}

/// Errors returned by composer implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ComposeError {
    /// The template engine rejected the template or context.
    #[error("follow-up body rendering failed: {0}")]
    Render(String),
}
