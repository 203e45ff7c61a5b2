use uuid::Uuid;

use crate::domain::value_objects::EntryId;

/// Errors raised by the entry and profile repositories
#[derive(Debug, Clone)]
pub enum RepositoryError {
    /// No entry with this id
    EntryNotFound { id: EntryId },

    /// No delivery profile with this id
    ProfileNotFound { id: Uuid },

    /// A stored row could not be mapped back into the domain
    InvalidRow { message: String },

    /// Database or driver failure
    InfrastructureError {
        message: String,
        source: Option<String>,
    },
}

impl RepositoryError {
    pub(crate) fn infrastructure(context: &str, err: impl std::fmt::Display) -> Self {
        RepositoryError::InfrastructureError {
            message: format!("{}: {}", context, err),
            source: Some(err.to_string()),
        }
    }
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::EntryNotFound { id } => write!(f, "Copy entry not found: {}", id),
            RepositoryError::ProfileNotFound { id } => {
                write!(f, "Delivery profile not found: {}", id)
            }
            RepositoryError::InvalidRow { message } => write!(f, "Invalid stored row: {}", message),
            RepositoryError::InfrastructureError { message, .. } => {
                write!(f, "Repository error: {}", message)
            }
        }
    }
}

impl std::error::Error for RepositoryError {}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;
