use thiserror::Error as ThisError;

use crate::domain::{errors::StorageError, value_objects::ImagePath};

/// Errors raised while building a store backend
#[derive(ThisError, Debug)]
pub enum StoreError {
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),
}

/// Convert an object_store error for an operation on `path` into a domain storage error
pub(crate) fn storage_error(
    operation: &str,
    path: &ImagePath,
    err: object_store::Error,
) -> StorageError {
    match err {
        object_store::Error::NotFound { .. } => StorageError::ObjectNotFound { path: path.clone() },
        object_store::Error::AlreadyExists { .. } | object_store::Error::Precondition { .. } => {
            StorageError::UploadRejected {
                path: path.clone(),
                reason: err.to_string(),
            }
        }
        object_store::Error::NotImplemented | object_store::Error::NotSupported { .. } => {
            StorageError::SigningUnavailable {
                reason: err.to_string(),
            }
        }
        _ => StorageError::InfrastructureError {
            message: format!("Failed to {} '{}': {}", operation, path, err),
            source: Some(err.to_string()),
        },
    }
}
