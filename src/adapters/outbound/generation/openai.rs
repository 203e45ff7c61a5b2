use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::{
    domain::models::GeneratedCopy,
    ports::external::{CopyGenerator, GeneratorError},
};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

pub const DEFAULT_MODEL: &str = "o3-2025-04-16";

/// Reasoning models can take minutes to answer.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

const PROMPT: &str = r#"You are an experienced copywriter and teacher of advertising concepts.
Pick one real Japanese advertising copy whose background and intent are documented in interviews or award sites (for example the Tokyo Copywriters Club), that is not widely known among new agency staff, and write about it for them.
Reply with a single JSON object and nothing else:
{
  "headline": string,
  "copy_text": string,
  "explanation": string,
  "sources": [{"title": string, "url": string}],
  "copywriter": string,
  "advertiser": string,
  "awards": string,
  "year_created": number,
  "tags": string[],
  "key_visual_urls": string[]
}
"tags" are the client's industries. "explanation" covers the creator, year, client, awards and the background and aim of the copy in plain prose readable in under a minute. Always include several real, reachable sources."#;

/// Chat-completions client for OpenAI-compatible APIs, in JSON mode
#[derive(Clone)]
pub struct OpenAiCopyGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

impl OpenAiCopyGenerator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, GeneratorError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GeneratorError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: OPENAI_API_BASE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Pull the generated copy out of a chat-completions response body
fn parse_completion(body: &str) -> Result<GeneratedCopy, GeneratorError> {
    let completion: ChatCompletion = serde_json::from_str(body)
        .map_err(|e| GeneratorError::InvalidResponse(format!("unexpected response body: {}", e)))?;

    let content = completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| GeneratorError::InvalidResponse("no content".to_string()))?;

    serde_json::from_str(&content)
        .map_err(|e| GeneratorError::InvalidResponse(format!("content is not valid JSON: {}", e)))
}

#[async_trait]
impl CopyGenerator for OpenAiCopyGenerator {
    async fn generate(&self) -> Result<GeneratedCopy, GeneratorError> {
        let request = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": PROMPT }],
            "response_format": { "type": "json_object" },
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GeneratorError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GeneratorError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(GeneratorError::Transport(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        debug!(model = %self.model, bytes = body.len(), "Received generated copy");
        parse_completion(&body)
    }
}

/// Generator used when no API key is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredGenerator;

#[async_trait]
impl CopyGenerator for UnconfiguredGenerator {
    async fn generate(&self) -> Result<GeneratedCopy, GeneratorError> {
        Err(GeneratorError::NotConfigured)
    }
}
