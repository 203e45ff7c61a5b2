use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use crate::{
    domain::errors::GenerationError,
    ports::{
        external::{CopyGenerator, GeneratorError},
        services::{EntryLifecycleService, GeneratedDraft, GenerationService},
    },
};

/// Stores model-proposed copy as a draft for an editor to review
#[derive(Clone)]
pub struct GenerationServiceImpl {
    generator: Arc<dyn CopyGenerator>,
    lifecycle: Arc<dyn EntryLifecycleService>,
}

impl GenerationServiceImpl {
    pub fn new(generator: Arc<dyn CopyGenerator>, lifecycle: Arc<dyn EntryLifecycleService>) -> Self {
        Self {
            generator,
            lifecycle,
        }
    }
}

#[async_trait]
impl GenerationService for GenerationServiceImpl {
    async fn generate_draft(&self) -> Result<GeneratedDraft, GenerationError> {
        let generated = self.generator.generate().await.map_err(|e| match e {
            GeneratorError::InvalidResponse(message) => GenerationError::InvalidResponse { message },
            other => GenerationError::Generator {
                message: other.to_string(),
            },
        })?;

        let skipped_image_urls = generated.key_visual_urls.clone();
        if !skipped_image_urls.is_empty() {
            warn!(
                urls = ?skipped_image_urls,
                "Not storing image URLs proposed by the generator"
            );
        }

        let entry = self
            .lifecycle
            .create(generated.into_draft(Utc::now()), Vec::new())
            .await?;

        info!(id = %entry.id, headline = %entry.content.headline, "Stored generated draft");
        Ok(GeneratedDraft {
            entry,
            skipped_image_urls,
        })
    }
}
