use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::GeneratedCopy;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("copy generator is not configured")]
    NotConfigured,

    #[error("copy generator request failed: {0}")]
    Transport(String),

    #[error("copy generator returned no usable content: {0}")]
    InvalidResponse(String),
}

/// External language model that proposes a copy entry
#[async_trait]
pub trait CopyGenerator: Send + Sync + 'static {
    async fn generate(&self) -> Result<GeneratedCopy, GeneratorError>;
}
