use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::CopyEntry;

#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("messaging request failed: {0}")]
    Transport(String),

    #[error("messaging API rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Outbound messaging platform
#[async_trait]
pub trait MessagingClient: Send + Sync + 'static {
    /// Push an entry to one subscriber
    async fn push_entry(&self, to: &str, entry: &CopyEntry) -> Result<(), MessagingError>;

    /// Answer a webhook event with a plain text message
    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<(), MessagingError>;
}
