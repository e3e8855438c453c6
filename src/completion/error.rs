// Backend failure taxonomy.
//
// Every variant is fatal for the item or model that hit it. Only the
// transient ones are retried by GuardedClient.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    /// The backend answered with a non-success status.
    #[error("{backend} returned {status}: {body}")]
    Http {
        backend: &'static str,
        status: u16,
        body: String,
    },

    /// The request never produced a response (DNS, connect, timeout).
    #[error("Completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response parsed but carried no text.
    #[error("{backend} returned no text for model {model}")]
    EmptyResponse {
        backend: &'static str,
        model: String,
    },

    /// The response body did not have the documented shape.
    #[error("{backend} returned an unexpected response: {detail}")]
    UnexpectedResponse {
        backend: &'static str,
        detail: String,
    },

    #[error("No API key configured for {0}")]
    MissingCredentials(&'static str),
}

impl CompletionError {
    /// Whether retrying the same request might succeed.
    ///
    /// Quota exhaustion (429), server-side failures (5xx) and network
    /// timeouts are transient; bad requests and auth failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            CompletionError::Http { status, .. } => *status == 429 || *status >= 500,
            CompletionError::Transport(err) => err.is_timeout() || err.is_connect(),
            CompletionError::EmptyResponse { .. }
            | CompletionError::UnexpectedResponse { .. }
            | CompletionError::MissingCredentials(_) => false,
        }
    }
}
