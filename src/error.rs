//! Error taxonomy shared by every collaborator call.

use thiserror::Error;

/// Failure of a mailbox, generation or forwarding call.
///
/// Cloneable so it can travel inside owner-loop events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MailError {
    /// The item no longer exists remotely
    #[error("Message not found: {0}")]
    NotFound(String),

    /// Network failure or timeout; the user may retry
    #[error("Network error: {0}")]
    Transient(String),

    /// The collaborator needed for this action is not configured
    #[error("{0} is not configured")]
    Unavailable(String),

    /// Bad user input (empty query, nothing selected, ...)
    #[error("Invalid input: {0}")]
    Invalid(String),
}

pub type MailResult<T> = Result<T, MailError>;

impl MailError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn transient(msg: impl ToString) -> Self {
        Self::Transient(msg.to_string())
    }

    pub fn unavailable(what: impl Into<String>) -> Self {
        Self::Unavailable(what.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether repeating the same call could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
