use crate::domain::{
    models::CopyEntry,
    value_objects::{EntryId, ImagePath},
};

/// Storage cleanup that failed after the main operation already succeeded.
///
/// The operation is reported as successful; the listed objects may still be
/// in the store and have to be removed by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageWarning {
    pub paths: Vec<ImagePath>,
    pub reason: String,
}

impl std::fmt::Display for StorageWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let paths: Vec<&str> = self.paths.iter().map(ImagePath::as_str).collect();
        write!(
            f,
            "could not remove {} image(s) ({}): {}",
            self.paths.len(),
            self.reason,
            paths.join(", ")
        )
    }
}

/// Result of a successful update
#[derive(Debug, Clone)]
pub struct EntryUpdate {
    pub entry: CopyEntry,
    /// Set when images the administrator removed could not be deleted from the store
    pub stale_images: Option<StorageWarning>,
}

/// Result of a successful delete
#[derive(Debug, Clone)]
pub struct EntryDeletion {
    pub id: EntryId,
    /// Set when the record is gone but some of its images are still stored
    pub orphaned_images: Option<StorageWarning>,
}
