use crate::domain::errors::{EntryLifecycleError, RepositoryError};

/// Errors that abort a delivery run as a whole.
///
/// A failed push to a single profile does not abort the run; it is reported
/// per profile in the run summary instead.
#[derive(Debug, Clone)]
pub enum DeliveryError {
    /// There is no published entry to deliver
    NoPublishedEntry,

    /// Profiles or entries could not be read
    Repository(RepositoryError),
}

impl std::fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryError::NoPublishedEntry => write!(f, "No published entry to deliver"),
            DeliveryError::Repository(e) => write!(f, "Delivery aborted: {}", e),
        }
    }
}

impl std::error::Error for DeliveryError {}

impl From<RepositoryError> for DeliveryError {
    fn from(err: RepositoryError) -> Self {
        DeliveryError::Repository(err)
    }
}

/// Errors raised while generating a draft entry with the language model
#[derive(Debug, Clone)]
pub enum GenerationError {
    /// The model could not be reached or refused the request
    Generator { message: String },

    /// The model answered with something that is not a usable copy entry
    InvalidResponse { message: String },

    /// Storing the generated draft failed
    Lifecycle(EntryLifecycleError),
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::Generator { message } => {
                write!(f, "Copy generator failed: {}", message)
            }
            GenerationError::InvalidResponse { message } => {
                write!(f, "Copy generator returned an invalid response: {}", message)
            }
            GenerationError::Lifecycle(e) => write!(f, "Storing generated copy failed: {}", e),
        }
    }
}

impl std::error::Error for GenerationError {}

impl From<EntryLifecycleError> for GenerationError {
    fn from(err: EntryLifecycleError) -> Self {
        GenerationError::Lifecycle(err)
    }
}
