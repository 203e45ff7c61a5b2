use crate::domain::errors::RepositoryError;

/// Errors surfaced by the public listing reads.
///
/// Signing failures never appear here; they degrade to missing URLs.
#[derive(Debug, Clone)]
pub enum ListingError {
    Repository(RepositoryError),
}

impl std::fmt::Display for ListingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingError::Repository(e) => write!(f, "Failed to load entries: {}", e),
        }
    }
}

impl std::error::Error for ListingError {}

impl From<RepositoryError> for ListingError {
    fn from(err: RepositoryError) -> Self {
        ListingError::Repository(err)
    }
}

pub type ListingResult<T> = Result<T, ListingError>;
