use crate::domain::value_objects::ImagePath;

/// Errors that can occur during object store operations
#[derive(Debug, Clone)]
pub enum StorageError {
    /// Object not found
    ObjectNotFound { path: ImagePath },

    /// The store refused to accept an upload
    UploadRejected { path: ImagePath, reason: String },

    /// The backend cannot produce signed URLs
    SigningUnavailable { reason: String },

    /// Validation error
    ValidationError { message: String },

    /// Infrastructure error with external source
    InfrastructureError {
        message: String,
        source: Option<String>, // Store error as string to allow Clone
    },
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::ObjectNotFound { path } => {
                write!(f, "Object not found: {}", path)
            }
            StorageError::UploadRejected { path, reason } => {
                write!(f, "Upload of '{}' rejected: {}", path, reason)
            }
            StorageError::SigningUnavailable { reason } => {
                write!(f, "URL signing unavailable: {}", reason)
            }
            StorageError::ValidationError { message } => {
                write!(f, "Validation error: {}", message)
            }
            StorageError::InfrastructureError { message, .. } => {
                write!(f, "Infrastructure error: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
