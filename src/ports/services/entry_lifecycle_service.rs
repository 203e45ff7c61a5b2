use async_trait::async_trait;

use crate::domain::{
    errors::{EntryLifecycleResult, RepositoryResult},
    models::{CopyEntry, EntryContent, EntryDeletion, EntryUpdate, ImageUpload},
    value_objects::{EntryId, ImagePath},
};

/// Service port for creating, editing and deleting copy entries together
/// with their key-visual images
#[async_trait]
pub trait EntryLifecycleService: Send + Sync + 'static {
    /// Upload every file, then insert the entry. A failed insert removes the uploads again.
    async fn create(
        &self,
        content: EntryContent,
        files: Vec<ImageUpload>,
    ) -> EntryLifecycleResult<CopyEntry>;

    /// Remove the images the administrator dropped, upload new ones and
    /// rewrite the entry with the resulting image list.
    async fn update(
        &self,
        existing: &CopyEntry,
        content: EntryContent,
        files: Vec<ImageUpload>,
        images_to_delete: Vec<ImagePath>,
    ) -> EntryLifecycleResult<EntryUpdate>;

    /// Delete the record, then its images
    async fn delete(&self, entry: &CopyEntry) -> EntryLifecycleResult<EntryDeletion>;

    /// Every entry regardless of status, newest first
    async fn list_all(&self) -> RepositoryResult<Vec<CopyEntry>>;

    async fn get(&self, id: &EntryId) -> RepositoryResult<Option<CopyEntry>>;
}
