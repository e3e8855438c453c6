use std::env;

use anyhow::{Context, Result};

use crate::completion::rate_limiter::interval_for;
use crate::normalize::TaxonomyPolicy;

/// Which completion backend to use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backend {
    /// Google Gemini (default), requires GEMINI_API_KEY
    Gemini,
    /// OpenAI chat completions, requires OPENAI_API_KEY
    OpenAi,
    /// Anthropic messages API, requires ANTHROPIC_API_KEY
    Anthropic,
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Gemini => "gemini",
            Backend::OpenAi => "openai",
            Backend::Anthropic => "anthropic",
        }
    }

    /// Model used for classification when TOPICA_MODEL is unset.
    pub fn default_model(&self) -> &'static str {
        match self {
            Backend::Gemini => "gemini-2.0-flash",
            Backend::OpenAi => "o3-mini",
            Backend::Anthropic => "claude-3-7-sonnet-20250219",
        }
    }

    /// Models swept in discovery mode when TOPICA_DISCOVERY_MODELS is unset.
    pub fn default_discovery_models(&self) -> Vec<String> {
        match self {
            Backend::Gemini => [
                "gemini-1.5-pro-002",
                "gemini-2.0-pro-exp-02-05",
                "gemini-2.0-flash",
                "gemini-2.0-flash-thinking-exp-01-21",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            other => vec![other.default_model().to_string()],
        }
    }

    fn key_var(&self) -> &'static str {
        match self {
            Backend::Gemini => "GEMINI_API_KEY",
            Backend::OpenAi => "OPENAI_API_KEY",
            Backend::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

/// Subject phrase embedded in both prompt templates.
pub const DEFAULT_SUBJECT: &str = "a CPI da Braskem no Senado brasileiro";

/// Central configuration loaded from environment variables.
///
/// Built once at startup and handed to the backend constructors, so nothing
/// downstream reads the environment on its own. The .env file is loaded
/// by main via dotenvy before this runs.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: Backend,
    pub gemini_api_key: String,
    pub openai_api_key: String,
    pub anthropic_api_key: String,
    /// Base URL overrides (proxies, regional endpoints, tests)
    pub gemini_api_url: Option<String>,
    pub openai_api_url: Option<String>,
    pub anthropic_api_url: Option<String>,
    /// Model used by the classification pipeline
    pub classify_model: String,
    /// Ordered model list swept by the discovery pipeline
    pub discovery_models: Vec<String>,
    /// Per-model pacing for completion calls
    pub requests_per_minute: f64,
    /// Retry attempts after a transient backend failure
    pub max_retries: u32,
    /// Name of the corpus column holding the comment text
    pub text_column: String,
    /// What to do with labels the model invents outside the taxonomy
    pub taxonomy_policy: TaxonomyPolicy,
    pub subject: String,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::load_with(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend_name = var("TOPICA_BACKEND").map(|v| v.trim().to_lowercase());
        let backend = match backend_name.as_deref() {
            None | Some("gemini") | Some("google") => Backend::Gemini,
            Some("openai") => Backend::OpenAi,
            Some("anthropic") | Some("claude") => Backend::Anthropic,
            Some(other) => anyhow::bail!(
                "Unknown TOPICA_BACKEND '{other}'. Expected gemini, openai or anthropic."
            ),
        };

        let taxonomy_policy = match var("TOPICA_TAXONOMY_POLICY") {
            Some(raw) => raw.parse()?,
            None => TaxonomyPolicy::default(),
        };

        let requests_per_minute = match var("TOPICA_REQUESTS_PER_MINUTE") {
            Some(raw) => {
                let rpm: f64 = raw.trim().parse().map_err(|_| {
                    anyhow::anyhow!("TOPICA_REQUESTS_PER_MINUTE must be a number, got '{raw}'")
                })?;
                interval_for(rpm).context("Invalid TOPICA_REQUESTS_PER_MINUTE")?;
                rpm
            }
            None => 15.0,
        };

        let max_retries = match var("TOPICA_MAX_RETRIES") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| {
                    anyhow::anyhow!("TOPICA_MAX_RETRIES must be a whole number, got '{raw}'")
                })?,
            None => 5,
        };

        let discovery_models = match var("TOPICA_DISCOVERY_MODELS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(String::from)
                .collect(),
            None => backend.default_discovery_models(),
        };

        Ok(Self {
            backend,
            gemini_api_key: var("GEMINI_API_KEY")
                .or_else(|| var("GOOGLE_API_KEY"))
                .unwrap_or_default(),
            openai_api_key: var("OPENAI_API_KEY").unwrap_or_default(),
            anthropic_api_key: var("ANTHROPIC_API_KEY").unwrap_or_default(),
            gemini_api_url: var("GEMINI_API_URL"),
            openai_api_url: var("OPENAI_API_URL"),
            anthropic_api_url: var("ANTHROPIC_API_URL"),
            classify_model: var("TOPICA_MODEL")
                .unwrap_or_else(|| backend.default_model().to_string()),
            discovery_models,
            requests_per_minute,
            max_retries,
            text_column: var("TOPICA_TEXT_COLUMN").unwrap_or_else(|| "Description".to_string()),
            taxonomy_policy,
            subject: var("TOPICA_SUBJECT").unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
        })
    }

    /// API key of the selected backend (empty when unset).
    pub fn api_key(&self) -> &str {
        match self.backend {
            Backend::Gemini => &self.gemini_api_key,
            Backend::OpenAi => &self.openai_api_key,
            Backend::Anthropic => &self.anthropic_api_key,
        }
    }

    /// Check that the selected backend can authenticate.
    /// Call this before any operation that makes completion calls.
    pub fn require_backend(&self) -> Result<()> {
        if self.api_key().is_empty() {
            anyhow::bail!(
                "{} not set but TOPICA_BACKEND is {}. Add it to your .env file.",
                self.backend.key_var(),
                self.backend.name()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::load_with(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_select_gemini() {
        let config = load(&[]).unwrap();
        assert_eq!(config.backend, Backend::Gemini);
        assert_eq!(config.classify_model, "gemini-2.0-flash");
        assert_eq!(config.discovery_models.len(), 4);
        assert_eq!(config.text_column, "Description");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.taxonomy_policy, TaxonomyPolicy::Drop);
    }

    #[test]
    fn test_require_backend_fails_without_key() {
        let config = load(&[]).unwrap();
        let err = config.require_backend().unwrap_err().to_string();
        assert!(err.contains("GEMINI_API_KEY"), "got: {err}");
    }

    #[test]
    fn test_google_api_key_is_a_fallback() {
        let config = load(&[("GOOGLE_API_KEY", "g-key")]).unwrap();
        assert_eq!(config.api_key(), "g-key");
        assert!(config.require_backend().is_ok());
    }

    #[test]
    fn test_openai_backend_defaults() {
        let config = load(&[("TOPICA_BACKEND", "OpenAI"), ("OPENAI_API_KEY", "sk")]).unwrap();
        assert_eq!(config.backend, Backend::OpenAi);
        assert_eq!(config.classify_model, "o3-mini");
        assert_eq!(config.discovery_models, vec!["o3-mini".to_string()]);
    }

    #[test]
    fn test_empty_sweep_list_does_not_block_backend() {
        let config = load(&[("GEMINI_API_KEY", "k"), ("TOPICA_DISCOVERY_MODELS", ",")]).unwrap();
        assert!(config.discovery_models.is_empty());
        assert!(config.require_backend().is_ok());
    }

    #[test]
    fn test_discovery_models_parsed_from_list() {
        let config = load(&[("TOPICA_DISCOVERY_MODELS", "a, b ,,c")]).unwrap();
        assert_eq!(config.discovery_models, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(load(&[("TOPICA_BACKEND", "mystery")]).is_err());
        assert!(load(&[("TOPICA_REQUESTS_PER_MINUTE", "0")]).is_err());
        assert!(load(&[("TOPICA_REQUESTS_PER_MINUTE", "fast")]).is_err());
        assert!(load(&[("TOPICA_REQUESTS_PER_MINUTE", "NaN")]).is_err());
        // Positive, but the wait between calls overflows a Duration
        assert!(load(&[("TOPICA_REQUESTS_PER_MINUTE", "1e-300")]).is_err());
        assert!(load(&[("TOPICA_TAXONOMY_POLICY", "sometimes")]).is_err());
    }
}
