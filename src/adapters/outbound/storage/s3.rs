use std::sync::Arc;

use object_store::aws::AmazonS3Builder;

use super::{
    error::StoreError,
    object_store_adapter::{ObjectStoreAdapter, UrlSigning},
};
use crate::domain::value_objects::BucketName;

/// Connection settings for an S3-compatible bucket
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub bucket: BucketName,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Custom endpoint for S3-compatible services (MinIO, Supabase storage, ...)
    pub endpoint: Option<String>,
}

/// Build an adapter backed by S3, signing URLs with the S3 presigner
pub fn build_s3_adapter(settings: &S3Settings) -> Result<ObjectStoreAdapter, StoreError> {
    let mut builder = AmazonS3Builder::from_env()
        .with_bucket_name(settings.bucket.as_str())
        .with_region(&settings.region);

    if let Some(access_key_id) = &settings.access_key_id {
        builder = builder.with_access_key_id(access_key_id);
    }
    if let Some(secret_access_key) = &settings.secret_access_key {
        builder = builder.with_secret_access_key(secret_access_key);
    }
    if let Some(endpoint) = &settings.endpoint {
        builder = builder
            .with_endpoint(endpoint)
            .with_allow_http(endpoint.starts_with("http://"))
            .with_virtual_hosted_style_request(false);
    }

    let s3 = Arc::new(builder.build()?);
    Ok(ObjectStoreAdapter::new(s3.clone(), UrlSigning::Native(s3)))
}
