use crate::domain::{
    errors::{RepositoryError, StorageError, ValidationError},
    value_objects::ImagePath,
};

/// What became of objects uploaded by an operation that failed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Compensation {
    /// Nothing had been uploaded, so there was nothing to undo
    NotNeeded,
    /// Every uploaded object was removed again
    Completed { removed: Vec<ImagePath> },
    /// Cleanup failed; these objects may still be in the store
    Failed {
        orphaned: Vec<ImagePath>,
        reason: String,
    },
}

impl Compensation {
    pub fn succeeded(&self) -> bool {
        !matches!(self, Compensation::Failed { .. })
    }

    /// Objects an administrator has to remove by hand
    pub fn orphaned(&self) -> &[ImagePath] {
        match self {
            Compensation::Failed { orphaned, .. } => orphaned,
            _ => &[],
        }
    }
}

static NO_COMPENSATION: Compensation = Compensation::NotNeeded;

/// The failure classes an administrator has to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    InvalidSubmission,
    Upload,
    Persistence,
    Compensation,
}

/// Errors returned by the copy-entry lifecycle operations
#[derive(Debug, Clone)]
pub enum EntryLifecycleError {
    /// The submitted form could not be turned into an entry
    InvalidSubmission(ValidationError),

    /// A new image could not be stored; nothing was written to the database
    Upload {
        source: StorageError,
        compensation: Compensation,
    },

    /// The database rejected the insert, update or delete
    Persistence {
        source: RepositoryError,
        compensation: Compensation,
    },
}

impl EntryLifecycleError {
    pub fn compensation(&self) -> &Compensation {
        match self {
            EntryLifecycleError::InvalidSubmission(_) => &NO_COMPENSATION,
            EntryLifecycleError::Upload { compensation, .. }
            | EntryLifecycleError::Persistence { compensation, .. } => compensation,
        }
    }

    /// The class of the failure that aborted the operation
    pub fn class(&self) -> FailureClass {
        match self {
            EntryLifecycleError::InvalidSubmission(_) => FailureClass::InvalidSubmission,
            EntryLifecycleError::Upload { .. } => FailureClass::Upload,
            EntryLifecycleError::Persistence { .. } => FailureClass::Persistence,
        }
    }

    /// Every failure class involved, primary first, then compensation if it failed
    pub fn classes(&self) -> Vec<FailureClass> {
        let mut classes = vec![self.class()];
        if !self.compensation().succeeded() {
            classes.push(FailureClass::Compensation);
        }
        classes
    }

    pub fn requires_manual_cleanup(&self) -> bool {
        !self.compensation().succeeded()
    }
}

impl std::fmt::Display for EntryLifecycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryLifecycleError::InvalidSubmission(e) => {
                return write!(f, "Invalid submission: {}", e);
            }
            EntryLifecycleError::Upload { source, .. } => {
                write!(f, "Image upload failed: {}", source)?;
            }
            EntryLifecycleError::Persistence { source, .. } => {
                write!(f, "Saving the entry failed: {}", source)?;
            }
        }

        match self.compensation() {
            Compensation::NotNeeded => Ok(()),
            Compensation::Completed { removed } => {
                write!(f, " ({} uploaded image(s) removed again)", removed.len())
            }
            Compensation::Failed { orphaned, reason } => {
                let paths: Vec<&str> = orphaned.iter().map(ImagePath::as_str).collect();
                write!(
                    f,
                    "; cleanup of new images also failed ({}), manual cleanup required for: {}",
                    reason,
                    paths.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for EntryLifecycleError {}

impl From<ValidationError> for EntryLifecycleError {
    fn from(err: ValidationError) -> Self {
        EntryLifecycleError::InvalidSubmission(err)
    }
}

/// Result type for lifecycle operations
pub type EntryLifecycleResult<T> = Result<T, EntryLifecycleError>;
