// Completion backends: trait-based abstraction over generative models.
//
// The CompletionClient trait is the only thing the pipelines see. Gemini,
// OpenAI and Anthropic implement it over HTTP; GuardedClient wraps any of
// them with per-model pacing and retry on transient failures.

pub mod anthropic;
pub mod error;
pub mod gemini;
pub mod guarded;
pub mod openai;
pub mod rate_limiter;
pub mod retry;
pub mod traits;

pub use error::CompletionError;
pub use guarded::GuardedClient;
pub use traits::CompletionClient;

use anyhow::Result;
use tracing::info;

use crate::config::{Backend, Config};
use rate_limiter::ModelRateLimiter;
use retry::RetryPolicy;

/// Build the configured backend, wrapped in pacing and retry.
pub fn from_config(config: &Config) -> Result<Box<dyn CompletionClient>> {
    config.require_backend()?;

    let limiter = ModelRateLimiter::per_minute(config.requests_per_minute)?;
    let policy = RetryPolicy::with_max_retries(config.max_retries);

    let client: Box<dyn CompletionClient> = match config.backend {
        Backend::Gemini => {
            info!("Using Gemini completion backend");
            let inner = gemini::GeminiClient::new(
                config.gemini_api_key.clone(),
                config.gemini_api_url.as_deref(),
            )?;
            Box::new(GuardedClient::new(inner, limiter, policy))
        }
        Backend::OpenAi => {
            info!("Using OpenAI completion backend");
            let inner = openai::OpenAiClient::new(
                config.openai_api_key.clone(),
                config.openai_api_url.as_deref(),
            )?;
            Box::new(GuardedClient::new(inner, limiter, policy))
        }
        Backend::Anthropic => {
            info!("Using Anthropic completion backend");
            let inner = anthropic::AnthropicClient::new(
                config.anthropic_api_key.clone(),
                config.anthropic_api_url.as_deref(),
            )?;
            Box::new(GuardedClient::new(inner, limiter, policy))
        }
    };

    Ok(client)
}

/// Build a reqwest client with the crate's user agent and a generous
/// timeout (discovery prompts carry the whole corpus).
pub(crate) fn http_client() -> Result<reqwest::Client, CompletionError> {
    reqwest::Client::builder()
        .user_agent(concat!("topica/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(600))
        .build()
        .map_err(CompletionError::Transport)
}
