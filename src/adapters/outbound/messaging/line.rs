use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
    domain::models::CopyEntry,
    ports::external::{MessagingClient, MessagingError},
};

const LINE_API_BASE: &str = "https://api.line.me/v2/bot/message";

/// HTTP request timeout for a single messaging call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// LINE Messaging API client
#[derive(Clone)]
pub struct LineMessagingClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl LineMessagingClient {
    pub fn new(access_token: impl Into<String>) -> Result<Self, MessagingError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MessagingError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            access_token: access_token.into(),
            base_url: LINE_API_BASE.to_string(),
        })
    }

    /// Point the client at another API host (a local mock, for instance)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn post(&self, endpoint: &str, body: &Value) -> Result<(), MessagingError> {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, endpoint))
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
            .map_err(|e| MessagingError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MessagingError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Flex bubble: headline, copy and explanation, sources in the footer
fn flex_message(entry: &CopyEntry) -> Value {
    let content = &entry.content;
    let sources: Vec<&str> = content.sources.iter().map(|s| s.title.as_str()).collect();

    json!({
        "type": "flex",
        "altText": content.headline,
        "contents": {
            "type": "bubble",
            "header": {
                "type": "box",
                "layout": "vertical",
                "contents": [
                    { "type": "text", "text": content.headline, "weight": "bold", "size": "xl", "wrap": true }
                ]
            },
            "body": {
                "type": "box",
                "layout": "vertical",
                "contents": [
                    { "type": "text", "text": content.copy_text, "wrap": true },
                    { "type": "text", "text": content.explanation, "wrap": true, "margin": "md" }
                ]
            },
            "footer": {
                "type": "box",
                "layout": "vertical",
                "contents": [
                    { "type": "text", "text": format!("出典: {}", sources.join(", ")), "size": "xs", "color": "#aaaaaa", "wrap": true }
                ]
            }
        }
    })
}

#[async_trait]
impl MessagingClient for LineMessagingClient {
    async fn push_entry(&self, to: &str, entry: &CopyEntry) -> Result<(), MessagingError> {
        let body = json!({
            "to": to,
            "messages": [flex_message(entry)],
        });
        self.post("push", &body).await
    }

    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<(), MessagingError> {
        let body = json!({
            "replyToken": reply_token,
            "messages": [{ "type": "text", "text": text }],
        });
        self.post("reply", &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        models::{EntryContent, SourceLink},
        value_objects::EntryId,
    };
    use chrono::Utc;

    #[test]
    fn test_flex_message_layout() {
        let entry = CopyEntry {
            id: EntryId::new(),
            serial_number: 1,
            content: EntryContent {
                headline: "Headline".to_string(),
                copy_text: "Copy".to_string(),
                sources: vec![SourceLink {
                    title: "TCC".to_string(),
                    url: "https://example.com".to_string(),
                }],
                ..Default::default()
            },
            key_visual_urls: Vec::new(),
            legacy_image_urls: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let message = flex_message(&entry);

        assert_eq!(message["altText"], "Headline");
        assert_eq!(message["contents"]["body"]["contents"][0]["text"], "Copy");
        assert_eq!(message["contents"]["footer"]["contents"][0]["text"], "出典: TCC");
    }
}
