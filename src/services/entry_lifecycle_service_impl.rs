use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use tracing::{error, info, warn};

use crate::{
    domain::{
        errors::{Compensation, EntryLifecycleError, EntryLifecycleResult, RepositoryResult},
        models::{
            CopyEntry, EntryContent, EntryDeletion, EntryOrder, EntryQuery, EntryRecord,
            EntryUpdate, ImageUpload, OrderField, StorageWarning,
        },
        value_objects::{EntryId, ImagePath},
    },
    ports::{repositories::EntryRepository, services::EntryLifecycleService, storage::ObjectStore},
};

/// Keeps entry records and their images in step.
///
/// There is no transaction spanning the store and the database; every step
/// that can leave the two out of step either undoes its uploads or reports
/// the objects that are left behind.
#[derive(Clone)]
pub struct EntryLifecycleServiceImpl {
    repository: Arc<dyn EntryRepository>,
    store: Arc<dyn ObjectStore>,
}

impl EntryLifecycleServiceImpl {
    pub fn new(repository: Arc<dyn EntryRepository>, store: Arc<dyn ObjectStore>) -> Self {
        Self { repository, store }
    }

    /// Upload a batch in parallel. Either every file is stored or none is.
    async fn upload_all(&self, files: Vec<ImageUpload>) -> EntryLifecycleResult<Vec<ImagePath>> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let uploads = files.into_iter().map(|file| {
            let path = ImagePath::generate(file.file_name.as_deref(), file.content_type.as_deref());
            async move {
                let result = self
                    .store
                    .upload(&path, file.data, file.content_type.as_deref())
                    .await;
                (path, result)
            }
        });

        let mut uploaded = Vec::new();
        let mut failure = None;
        for (path, result) in join_all(uploads).await {
            match result {
                Ok(stored) => uploaded.push(stored),
                Err(e) => {
                    warn!(path = %path, error = %e, "Image upload failed");
                    if failure.is_none() {
                        failure = Some(e);
                    }
                }
            }
        }

        match failure {
            None => Ok(uploaded),
            Some(source) => {
                let compensation = self.compensate(uploaded).await;
                Err(EntryLifecycleError::Upload {
                    source,
                    compensation,
                })
            }
        }
    }

    /// Remove objects uploaded by an operation that is being abandoned
    async fn compensate(&self, uploaded: Vec<ImagePath>) -> Compensation {
        if uploaded.is_empty() {
            return Compensation::NotNeeded;
        }

        match self.store.remove(&uploaded).await {
            Ok(()) => {
                info!(count = uploaded.len(), "Removed images of abandoned operation");
                Compensation::Completed { removed: uploaded }
            }
            Err(e) => {
                error!(
                    error = %e,
                    paths = ?uploaded.iter().map(ImagePath::as_str).collect::<Vec<_>>(),
                    "Cleanup of uploaded images failed, manual cleanup required"
                );
                Compensation::Failed {
                    orphaned: uploaded,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Best-effort removal; a failure becomes a warning for the caller
    async fn remove_best_effort(&self, paths: Vec<ImagePath>) -> Option<StorageWarning> {
        if paths.is_empty() {
            return None;
        }

        match self.store.remove(&paths).await {
            Ok(()) => None,
            Err(e) => {
                warn!(error = %e, count = paths.len(), "Image removal failed");
                Some(StorageWarning {
                    paths,
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// The removals that apply to `existing`: referenced by it, each path once.
fn referenced_removals(existing: &[ImagePath], requested: Vec<ImagePath>) -> Vec<ImagePath> {
    let mut removals: Vec<ImagePath> = Vec::new();
    for path in requested {
        if !existing.contains(&path) {
            warn!(path = %path, "Ignoring removal of an image the entry does not reference");
            continue;
        }
        if !removals.contains(&path) {
            removals.push(path);
        }
    }
    removals
}

/// (existing - removed) followed by the new uploads, without duplicates
fn merge_image_list(
    existing: &[ImagePath],
    removed: &[ImagePath],
    added: &[ImagePath],
) -> Vec<ImagePath> {
    let mut merged: Vec<ImagePath> = Vec::with_capacity(existing.len() + added.len());
    for path in existing
        .iter()
        .filter(|path| !removed.contains(path))
        .chain(added)
    {
        if !merged.contains(path) {
            merged.push(path.clone());
        }
    }
    merged
}

#[async_trait]
impl EntryLifecycleService for EntryLifecycleServiceImpl {
    async fn create(
        &self,
        content: EntryContent,
        files: Vec<ImageUpload>,
    ) -> EntryLifecycleResult<CopyEntry> {
        let key_visual_urls = self.upload_all(files).await?;

        let record = EntryRecord {
            content,
            key_visual_urls: key_visual_urls.clone(),
            legacy_image_urls: Vec::new(),
            updated_at: Utc::now(),
        };

        match self.repository.insert(record).await {
            Ok(entry) => {
                info!(
                    id = %entry.id,
                    serial_number = entry.serial_number,
                    images = entry.key_visual_urls.len(),
                    "Created copy entry"
                );
                Ok(entry)
            }
            Err(source) => {
                warn!(error = %source, "Inserting copy entry failed");
                let compensation = self.compensate(key_visual_urls).await;
                Err(EntryLifecycleError::Persistence {
                    source,
                    compensation,
                })
            }
        }
    }

    async fn update(
        &self,
        existing: &CopyEntry,
        content: EntryContent,
        files: Vec<ImageUpload>,
        images_to_delete: Vec<ImagePath>,
    ) -> EntryLifecycleResult<EntryUpdate> {
        let removals = referenced_removals(&existing.key_visual_urls, images_to_delete);
        let stale_images = self.remove_best_effort(removals.clone()).await;

        let added = self.upload_all(files).await?;

        let record = EntryRecord {
            content,
            key_visual_urls: merge_image_list(&existing.key_visual_urls, &removals, &added),
            legacy_image_urls: existing.legacy_image_urls.clone(),
            updated_at: Utc::now(),
        };

        match self.repository.update(&existing.id, record).await {
            Ok(entry) => {
                info!(
                    id = %entry.id,
                    removed = removals.len(),
                    added = added.len(),
                    "Updated copy entry"
                );
                Ok(EntryUpdate {
                    entry,
                    stale_images,
                })
            }
            Err(source) => {
                warn!(id = %existing.id, error = %source, "Updating copy entry failed");
                let compensation = self.compensate(added).await;
                Err(EntryLifecycleError::Persistence {
                    source,
                    compensation,
                })
            }
        }
    }

    async fn delete(&self, entry: &CopyEntry) -> EntryLifecycleResult<EntryDeletion> {
        if let Err(source) = self.repository.delete(&entry.id).await {
            warn!(id = %entry.id, error = %source, "Deleting copy entry failed");
            return Err(EntryLifecycleError::Persistence {
                source,
                compensation: Compensation::NotNeeded,
            });
        }

        let orphaned_images = self
            .remove_best_effort(entry.key_visual_urls.clone())
            .await;
        if let Some(warning) = &orphaned_images {
            error!(id = %entry.id, %warning, "Entry deleted but its images remain in the store");
        }

        info!(id = %entry.id, "Deleted copy entry");
        Ok(EntryDeletion {
            id: entry.id,
            orphaned_images,
        })
    }

    async fn list_all(&self) -> RepositoryResult<Vec<CopyEntry>> {
        let query = EntryQuery::builder()
            .order(EntryOrder::desc(OrderField::CreatedAt))
            .build();
        self.repository.select(&query).await
    }

    async fn get(&self, id: &EntryId) -> RepositoryResult<Option<CopyEntry>> {
        self.repository.find(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::{
        persistence::InMemoryEntryRepository, storage::ObjectStoreAdapter,
    };
    use crate::domain::models::EntryStatus;
    use bytes::Bytes;

    fn path(value: &str) -> ImagePath {
        ImagePath::new(value.to_string()).unwrap()
    }

    fn upload(name: &str) -> ImageUpload {
        ImageUpload {
            file_name: Some(name.to_string()),
            content_type: Some("image/png".to_string()),
            data: Bytes::from_static(b"\x89PNG"),
        }
    }

    fn create_test_service() -> (EntryLifecycleServiceImpl, Arc<ObjectStoreAdapter>) {
        let store = Arc::new(ObjectStoreAdapter::in_memory());
        let repository = Arc::new(InMemoryEntryRepository::new());
        (
            EntryLifecycleServiceImpl::new(repository, store.clone()),
            store,
        )
    }

    #[test]
    fn test_merge_image_list() {
        let (a, b, c) = (path("a.png"), path("b.png"), path("c.png"));

        assert_eq!(
            merge_image_list(&[a.clone(), b.clone()], &[a.clone()], &[c.clone()]),
            vec![b.clone(), c.clone()]
        );
        assert_eq!(
            merge_image_list(&[a.clone(), b.clone()], &[], &[a.clone()]),
            vec![a, b]
        );
    }

    #[test]
    fn test_referenced_removals_ignores_foreign_paths() {
        let (a, b) = (path("a.png"), path("b.png"));

        let removals =
            referenced_removals(&[a.clone()], vec![a.clone(), b, a.clone()]);

        assert_eq!(removals, vec![a]);
    }

    #[tokio::test]
    async fn test_create_uploads_every_file() {
        let (service, store) = create_test_service();

        let entry = service
            .create(
                EntryContent {
                    headline: "Test".to_string(),
                    ..Default::default()
                },
                vec![upload("one.png"), upload("two.png")],
            )
            .await
            .unwrap();

        assert_eq!(entry.content.status, EntryStatus::Draft);
        assert_eq!(entry.key_visual_urls.len(), 2);
        assert_ne!(entry.key_visual_urls[0], entry.key_visual_urls[1]);
        for path in &entry.key_visual_urls {
            assert!(path.as_str().ends_with(".png"));
            assert!(store.exists(path).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_delete_removes_record_and_images() {
        let (service, store) = create_test_service();
        let entry = service
            .create(EntryContent::default(), vec![upload("kv.jpg")])
            .await
            .unwrap();

        let deletion = service.delete(&entry).await.unwrap();

        assert_eq!(deletion.id, entry.id);
        assert!(deletion.orphaned_images.is_none());
        assert!(service.get(&entry.id).await.unwrap().is_none());
        assert!(!store.exists(&entry.key_visual_urls[0]).await.unwrap());
    }
}
