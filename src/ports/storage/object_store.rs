use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::{errors::StorageResult, value_objects::ImagePath};

/// Port for the key-visual object store.
///
/// Every path is relative to the one bucket the store was built for.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Store object data under `path`, returning the path that was written
    async fn upload(
        &self,
        path: &ImagePath,
        data: Bytes,
        content_type: Option<&str>,
    ) -> StorageResult<ImagePath>;

    /// Delete objects. Missing objects are not an error.
    async fn remove(&self, paths: &[ImagePath]) -> StorageResult<()>;

    /// Produce time-limited URLs for a batch of paths, in input order
    async fn create_signed_urls(
        &self,
        paths: &[ImagePath],
        expires_in: Duration,
    ) -> StorageResult<Vec<SignedUrl>>;

    /// Retrieve object data
    async fn download(&self, path: &ImagePath) -> StorageResult<StoredObject>;

    /// Check if object exists
    async fn exists(&self, path: &ImagePath) -> StorageResult<bool>;
}

/// A signed URL for one stored path
#[derive(Debug, Clone, PartialEq)]
pub struct SignedUrl {
    pub path: ImagePath,
    pub url: String,
}

/// Object data plus the content type recorded at upload
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: Option<String>,
}
