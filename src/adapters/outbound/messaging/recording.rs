use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::{
    domain::{models::CopyEntry, value_objects::EntryId},
    ports::external::{MessagingClient, MessagingError},
};

/// A message the recording messenger accepted
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedMessage {
    Push { to: String, entry_id: EntryId },
    Reply { reply_token: String, text: String },
}

/// Messaging client that keeps messages in memory instead of sending them.
///
/// Used when no messaging credentials are configured, and in tests.
#[derive(Clone, Default)]
pub struct RecordingMessenger {
    sent: Arc<RwLock<Vec<RecordedMessage>>>,
    unreachable: Arc<RwLock<HashSet<String>>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make pushes to this recipient fail
    pub async fn mark_unreachable(&self, to: &str) {
        self.unreachable.write().await.insert(to.to_string());
    }

    pub async fn sent(&self) -> Vec<RecordedMessage> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl MessagingClient for RecordingMessenger {
    async fn push_entry(&self, to: &str, entry: &CopyEntry) -> Result<(), MessagingError> {
        if self.unreachable.read().await.contains(to) {
            return Err(MessagingError::Rejected {
                status: 400,
                body: format!("recipient {} is unreachable", to),
            });
        }

        info!(to, entry = %entry.id, "Recorded push message");
        self.sent.write().await.push(RecordedMessage::Push {
            to: to.to_string(),
            entry_id: entry.id,
        });
        Ok(())
    }

    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<(), MessagingError> {
        self.sent.write().await.push(RecordedMessage::Reply {
            reply_token: reply_token.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}
