use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::ports::{
    external::MessagingClient,
    services::{WebhookEvent, WebhookService},
};

pub const WELCOME_MESSAGE: &str =
    "「まいコー」まいにち広告部は、すぐれた広告を1日1本お届けするサービスです！お楽しみに！";

/// Answers new followers with a welcome message
#[derive(Clone)]
pub struct WebhookServiceImpl {
    messenger: Arc<dyn MessagingClient>,
}

impl WebhookServiceImpl {
    pub fn new(messenger: Arc<dyn MessagingClient>) -> Self {
        Self { messenger }
    }
}

#[async_trait]
impl WebhookService for WebhookServiceImpl {
    async fn handle_events(&self, events: Vec<WebhookEvent>) -> usize {
        let mut replies = 0;

        for event in events {
            let token = match (event.kind.as_str(), event.reply_token.as_deref()) {
                ("follow", Some(token)) => token,
                (kind, _) => {
                    debug!(kind, "Ignoring webhook event");
                    continue;
                }
            };

            match self.messenger.reply_text(token, WELCOME_MESSAGE).await {
                Ok(()) => replies += 1,
                Err(e) => warn!(error = %e, "Welcome reply failed"),
            }
        }

        replies
    }
}
