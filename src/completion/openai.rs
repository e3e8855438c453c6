// OpenAI chat completions implementation.
//
// API docs: https://platform.openai.com/docs/api-reference/chat

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::CompletionError;
use super::traits::CompletionClient;

/// Default OpenAI REST endpoint.
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";

const BACKEND: &str = "openai";

/// OpenAI chat completion client.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: Option<&str>) -> Result<Self, CompletionError> {
        if api_key.is_empty() {
            return Err(CompletionError::MissingCredentials(BACKEND));
        }
        Ok(Self {
            client: super::http_client()?,
            api_key,
            base_url: base_url
                .unwrap_or(DEFAULT_OPENAI_API_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &str, model_id: &str) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: model_id,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        debug!(model = model_id, prompt_chars = prompt.len(), "OpenAI request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
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

        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| CompletionError::UnexpectedResponse {
                    backend: BACKEND,
                    detail: e.to_string(),
                })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| CompletionError::EmptyResponse {
                backend: BACKEND,
                model: model_id.to_string(),
            })
    }
}

// --- OpenAI request/response types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
