use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use futures::future::join_all;
use object_store::{
    memory::InMemory, path::Path as ObjectPath, signer::Signer, Attribute, Attributes,
    ObjectStore as ApacheObjectStore, PutOptions, PutPayload,
};

use super::{error::storage_error, local_signer::LocalUrlSigner};
use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        value_objects::ImagePath,
    },
    ports::storage::{ObjectStore, SignedUrl, StoredObject},
};

/// How read URLs are produced for the wrapped store
#[derive(Clone)]
pub enum UrlSigning {
    /// The backend's own presigner (S3 and compatibles)
    Native(Arc<dyn Signer>),
    /// Tokens checked by this application's `/media` route
    Local(LocalUrlSigner),
}

/// Adapter that implements our ObjectStore trait using Apache object_store.
///
/// The wrapped store is already scoped to the key-visuals bucket.
#[derive(Clone)]
pub struct ObjectStoreAdapter {
    inner: Arc<dyn ApacheObjectStore>,
    signing: UrlSigning,
}

impl ObjectStoreAdapter {
    pub fn new(store: Arc<dyn ApacheObjectStore>, signing: UrlSigning) -> Self {
        Self {
            inner: store,
            signing,
        }
    }

    /// An empty in-memory store with local signing, for development and tests
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemory::new()),
            UrlSigning::Local(LocalUrlSigner::new(
                "development-secret",
                "http://localhost:3000",
            )),
        )
    }

    /// The local signer, when URLs are served by the application itself
    pub fn local_signer(&self) -> Option<&LocalUrlSigner> {
        match &self.signing {
            UrlSigning::Local(signer) => Some(signer),
            UrlSigning::Native(_) => None,
        }
    }
}

#[async_trait]
impl ObjectStore for ObjectStoreAdapter {
    async fn upload(
        &self,
        path: &ImagePath,
        data: Bytes,
        content_type: Option<&str>,
    ) -> StorageResult<ImagePath> {
        let location = ObjectPath::from(path.as_str());

        let mut attributes = Attributes::new();
        if let Some(content_type) = content_type {
            attributes.insert(Attribute::ContentType, content_type.to_string().into());
        }
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        self.inner
            .put_opts(&location, PutPayload::from(data), options)
            .await
            .map_err(|e| storage_error("upload", path, e))?;

        Ok(path.clone())
    }

    async fn remove(&self, paths: &[ImagePath]) -> StorageResult<()> {
        let deletions = paths.iter().map(|path| async move {
            match self.inner.delete(&ObjectPath::from(path.as_str())).await {
                Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
                Err(e) => Err(storage_error("remove", path, e)),
            }
        });

        // Attempt every deletion, then report the first failure.
        join_all(deletions)
            .await
            .into_iter()
            .collect::<StorageResult<Vec<()>>>()?;
        Ok(())
    }

    async fn create_signed_urls(
        &self,
        paths: &[ImagePath],
        expires_in: Duration,
    ) -> StorageResult<Vec<SignedUrl>> {
        match &self.signing {
            UrlSigning::Local(signer) => {
                let ttl = chrono::Duration::from_std(expires_in).map_err(|e| {
                    StorageError::ValidationError {
                        message: format!("Invalid URL lifetime: {}", e),
                    }
                })?;
                let expires_at = Utc::now() + ttl;

                Ok(paths
                    .iter()
                    .map(|path| SignedUrl {
                        path: path.clone(),
                        url: signer.sign(path, expires_at),
                    })
                    .collect())
            }
            UrlSigning::Native(signer) => {
                let locations: Vec<ObjectPath> = paths
                    .iter()
                    .map(|path| ObjectPath::from(path.as_str()))
                    .collect();

                let urls = signer
                    .signed_urls(http::Method::GET, &locations, expires_in)
                    .await
                    .map_err(|e| StorageError::SigningUnavailable {
                        reason: e.to_string(),
                    })?;

                Ok(paths
                    .iter()
                    .zip(urls)
                    .map(|(path, url)| SignedUrl {
                        path: path.clone(),
                        url: url.to_string(),
                    })
                    .collect())
            }
        }
    }

    async fn download(&self, path: &ImagePath) -> StorageResult<StoredObject> {
        let location = ObjectPath::from(path.as_str());

        let result = self
            .inner
            .get(&location)
            .await
            .map_err(|e| storage_error("download", path, e))?;

        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|value| value.to_string());

        let data = result
            .bytes()
            .await
            .map_err(|e| storage_error("read", path, e))?;

        Ok(StoredObject { data, content_type })
    }

    async fn exists(&self, path: &ImagePath) -> StorageResult<bool> {
        let location = ObjectPath::from(path.as_str());

        match self.inner.head(&location).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(storage_error("check", path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(value: &str) -> ImagePath {
        ImagePath::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_basic_object_operations() {
        let adapter = ObjectStoreAdapter::in_memory();
        let key = path("kv/one.png");

        let stored = adapter
            .upload(&key, Bytes::from_static(b"png"), Some("image/png"))
            .await
            .unwrap();
        assert_eq!(stored, key);
        assert!(adapter.exists(&key).await.unwrap());

        let object = adapter.download(&key).await.unwrap();
        assert_eq!(object.data, Bytes::from_static(b"png"));
        assert_eq!(object.content_type.as_deref(), Some("image/png"));

        // Removing twice is fine
        adapter.remove(&[key.clone()]).await.unwrap();
        adapter.remove(&[key.clone()]).await.unwrap();
        assert!(!adapter.exists(&key).await.unwrap());
    }

    #[tokio::test]
    async fn test_signed_urls_keep_input_order() {
        let adapter = ObjectStoreAdapter::in_memory();
        let paths = vec![path("b.png"), path("a.png")];

        let signed = adapter
            .create_signed_urls(&paths, Duration::from_secs(300))
            .await
            .unwrap();

        assert_eq!(signed.len(), 2);
        assert_eq!(signed[0].path, paths[0]);
        assert!(signed[0].url.contains("/media/b.png?expires="));
        assert!(signed[1].url.contains("/media/a.png?expires="));
    }

    #[tokio::test]
    async fn test_download_missing_object() {
        let adapter = ObjectStoreAdapter::in_memory();

        let err = adapter.download(&path("missing.png")).await.unwrap_err();
        assert!(matches!(err, StorageError::ObjectNotFound { .. }));
    }
}
