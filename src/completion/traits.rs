// Completion client trait: the swap-ready abstraction.
//
// One operation: send a prompt to a named model, get its text back. The
// pipelines only ever hold a `&dyn CompletionClient`, so tests drive them
// with scripted in-memory clients and production wraps an HTTP backend.

use async_trait::async_trait;

use super::error::CompletionError;

/// Trait for one-shot text completion against a generative model.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send `prompt` to `model_id` and return the model's raw text.
    async fn complete(&self, prompt: &str, model_id: &str) -> Result<String, CompletionError>;
}
