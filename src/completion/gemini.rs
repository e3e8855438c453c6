// Google Gemini implementation.
//
// Uses the `generateContent` REST method. The API key travels as a query
// parameter. Free-tier quotas are low (a handful of requests per minute for
// the pro models), so this client is normally wrapped in a GuardedClient.
//
// API docs: https://ai.google.dev/api/generate-content

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::CompletionError;
use super::traits::CompletionClient;

/// Default Gemini REST endpoint.
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const BACKEND: &str = "gemini";

/// Gemini completion client.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client for the given API key, optionally against a
    /// different base URL.
    pub fn new(api_key: String, base_url: Option<&str>) -> Result<Self, CompletionError> {
        if api_key.is_empty() {
            return Err(CompletionError::MissingCredentials(BACKEND));
        }
        Ok(Self {
            client: super::http_client()?,
            api_key,
            base_url: base_url
                .unwrap_or(DEFAULT_GEMINI_API_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, prompt: &str, model_id: &str) -> Result<String, CompletionError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model_id);

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(model = model_id, prompt_chars = prompt.len(), "Gemini request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
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

        let parsed: GenerateContentResponse =
            response
                .json()
                .await
                .map_err(|e| CompletionError::UnexpectedResponse {
                    backend: BACKEND,
                    detail: e.to_string(),
                })?;

        extract_text(parsed).ok_or_else(|| CompletionError::EmptyResponse {
            backend: BACKEND,
            model: model_id.to_string(),
        })
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> Option<String> {
    let candidate = response.candidates.into_iter().next()?;
    let text: String = candidate
        .content?
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

// --- Gemini request/response types ---

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}
