use async_trait::async_trait;

use crate::domain::{
    errors::{DeliveryError, GenerationError},
    models::{CopyEntry, DeliveryReport},
};

/// Pushes the latest published entry to every due subscriber
#[async_trait]
pub trait DeliveryService: Send + Sync + 'static {
    async fn deliver_due(&self) -> Result<DeliveryReport, DeliveryError>;
}

/// A draft created by the generation job
#[derive(Debug, Clone)]
pub struct GeneratedDraft {
    pub entry: CopyEntry,
    /// Image URLs the model proposed that were not stored
    pub skipped_image_urls: Vec<String>,
}

/// Asks the language model for a new entry and stores it as a draft
#[async_trait]
pub trait GenerationService: Send + Sync + 'static {
    async fn generate_draft(&self) -> Result<GeneratedDraft, GenerationError>;
}

/// Handles inbound messaging platform events
#[async_trait]
pub trait WebhookService: Send + Sync + 'static {
    /// Reply to follow events; returns how many replies were sent
    async fn handle_events(&self, events: Vec<WebhookEvent>) -> usize;
}

/// An inbound messaging event, reduced to what the service acts on
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "replyToken")]
    pub reply_token: Option<String>,
}
