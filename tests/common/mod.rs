#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use daily_copy::{
    adapters::outbound::{persistence::InMemoryEntryRepository, storage::ObjectStoreAdapter},
    domain::{
        errors::{RepositoryResult, StorageResult},
        EntryContent, EntryQuery, EntryRecord, EntryStatus, ImagePath, ImageUpload, TagSet,
    },
    ports::storage::{SignedUrl, StoredObject},
    CopyEntry, EntryId, EntryRepository, ObjectStore, RepositoryError, StorageError,
};

pub fn png(name: &str) -> ImageUpload {
    ImageUpload {
        file_name: Some(name.to_string()),
        content_type: Some("image/png".to_string()),
        data: Bytes::from(format!("png bytes of {}", name)),
    }
}

pub fn content(headline: &str, status: EntryStatus) -> EntryContent {
    EntryContent {
        headline: headline.to_string(),
        copy_text: format!("{} copy", headline),
        explanation: format!("Why {} works", headline),
        advertiser: "Acme".to_string(),
        status,
        ..Default::default()
    }
}

/// Published content with tags and a publish date `day` days into 2024
pub fn published(headline: &str, day: u32, industry: &str, category: &str) -> EntryContent {
    EntryContent {
        industry_tags: TagSet::parse(industry),
        category_tags: TagSet::parse(category),
        publish_at: Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).single(),
        ..content(headline, EntryStatus::Published)
    }
}

pub fn path(value: &str) -> ImagePath {
    ImagePath::new(value.to_string()).unwrap()
}

/// Object store wrapper whose operations can be made to fail
#[derive(Clone)]
pub struct FaultyStore {
    inner: ObjectStoreAdapter,
    /// 1-based upload call that fails; 0 disables
    fail_upload_number: Arc<AtomicUsize>,
    upload_calls: Arc<AtomicUsize>,
    fail_removals: Arc<AtomicBool>,
    fail_signing: Arc<AtomicBool>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self {
            inner: ObjectStoreAdapter::in_memory(),
            fail_upload_number: Arc::new(AtomicUsize::new(0)),
            upload_calls: Arc::new(AtomicUsize::new(0)),
            fail_removals: Arc::new(AtomicBool::new(false)),
            fail_signing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn fail_upload_number(&self, n: usize) {
        self.fail_upload_number.store(n, Ordering::SeqCst);
    }

    pub fn fail_removals(&self, fail: bool) {
        self.fail_removals.store(fail, Ordering::SeqCst);
    }

    pub fn fail_signing(&self, fail: bool) {
        self.fail_signing.store(fail, Ordering::SeqCst);
    }

    pub async fn contains(&self, path: &ImagePath) -> bool {
        self.inner.exists(path).await.unwrap()
    }

    /// Put an object directly, bypassing the fault switches
    pub async fn seed(&self, path: &ImagePath) {
        self.inner
            .upload(path, Bytes::from_static(b"seed"), Some("image/png"))
            .await
            .unwrap();
    }
}

fn injected(message: &str) -> StorageError {
    StorageError::InfrastructureError {
        message: message.to_string(),
        source: None,
    }
}

#[async_trait]
impl ObjectStore for FaultyStore {
    async fn upload(
        &self,
        path: &ImagePath,
        data: Bytes,
        content_type: Option<&str>,
    ) -> StorageResult<ImagePath> {
        let call = self.upload_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_upload_number.load(Ordering::SeqCst) {
            return Err(injected("injected upload failure"));
        }
        self.inner.upload(path, data, content_type).await
    }

    async fn remove(&self, paths: &[ImagePath]) -> StorageResult<()> {
        if self.fail_removals.load(Ordering::SeqCst) {
            return Err(injected("injected removal failure"));
        }
        self.inner.remove(paths).await
    }

    async fn create_signed_urls(
        &self,
        paths: &[ImagePath],
        expires_in: Duration,
    ) -> StorageResult<Vec<SignedUrl>> {
        if self.fail_signing.load(Ordering::SeqCst) {
            return Err(StorageError::SigningUnavailable {
                reason: "injected signing failure".to_string(),
            });
        }
        self.inner.create_signed_urls(paths, expires_in).await
    }

    async fn download(&self, path: &ImagePath) -> StorageResult<StoredObject> {
        self.inner.download(path).await
    }

    async fn exists(&self, path: &ImagePath) -> StorageResult<bool> {
        self.inner.exists(path).await
    }
}

/// Entry repository wrapper with failure switches and a call counter
#[derive(Clone, Default)]
pub struct FaultyRepository {
    inner: InMemoryEntryRepository,
    fail_writes: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl FaultyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make insert, update and delete fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of repository calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check_write(&self) -> RepositoryResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::InfrastructureError {
                message: "injected database failure".to_string(),
                source: None,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl EntryRepository for FaultyRepository {
    async fn select(&self, query: &EntryQuery) -> RepositoryResult<Vec<CopyEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.select(query).await
    }

    async fn find(&self, id: &EntryId) -> RepositoryResult<Option<CopyEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find(id).await
    }

    async fn insert(&self, record: EntryRecord) -> RepositoryResult<CopyEntry> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_write()?;
        self.inner.insert(record).await
    }

    async fn update(&self, id: &EntryId, record: EntryRecord) -> RepositoryResult<CopyEntry> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_write()?;
        self.inner.update(id, record).await
    }

    async fn delete(&self, id: &EntryId) -> RepositoryResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_write()?;
        self.inner.delete(id).await
    }
}
