// Anthropic messages API implementation.
//
// API docs: https://docs.anthropic.com/en/api/messages

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::CompletionError;
use super::traits::CompletionClient;

/// Default Anthropic REST endpoint.
pub const DEFAULT_ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";

const API_VERSION: &str = "2023-06-01";

/// Upper bound on generated tokens. Topic lists are short; this only
/// guards against runaway answers.
const MAX_TOKENS: u32 = 4096;

const BACKEND: &str = "anthropic";

/// Anthropic messages client.
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AnthropicClient {
    pub fn new(api_key: String, base_url: Option<&str>) -> Result<Self, CompletionError> {
        if api_key.is_empty() {
            return Err(CompletionError::MissingCredentials(BACKEND));
        }
        Ok(Self {
            client: super::http_client()?,
            api_key,
            base_url: base_url
                .unwrap_or(DEFAULT_ANTHROPIC_API_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    async fn complete(&self, prompt: &str, model_id: &str) -> Result<String, CompletionError> {
        let url = format!("{}/messages", self.base_url);

        let request = MessagesRequest {
            model: model_id,
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        debug!(model = model_id, prompt_chars = prompt.len(), "Anthropic request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Http {
                backend: BACKEND,
                status,
                body,
            });
        }

        let parsed: MessagesResponse =
            response
                .json()
                .await
                .map_err(|e| CompletionError::UnexpectedResponse {
                    backend: BACKEND,
                    detail: e.to_string(),
                })?;

        let text: String = parsed
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        if text.trim().is_empty() {
            return Err(CompletionError::EmptyResponse {
                backend: BACKEND,
                model: model_id.to_string(),
            });
        }
        Ok(text)
    }
}

// --- Anthropic request/response types ---

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}
