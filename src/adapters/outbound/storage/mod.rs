// Infrastructure error types
pub mod error;

// Storage implementations
pub mod local_signer;
pub mod object_store_adapter;
pub mod s3;

// Re-export key types
pub use error::StoreError;
pub use local_signer::{LocalUrlSigner, SignatureError};
pub use object_store_adapter::{ObjectStoreAdapter, UrlSigning};
pub use s3::{build_s3_adapter, S3Settings};
