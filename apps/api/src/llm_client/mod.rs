/// LLM client layer — the single point of entry for all model calls in Veraison.
///
/// ARCHITECTURAL RULE: No other module may call a provider API directly.
/// All LLM interactions MUST go through an `LlmProvider` implementation.
///
/// The backend (Claude or Gemini) is selected once at startup via the
/// LLM_PROVIDER environment variable and held in `AppState` as a trait object.
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::config::Config;

pub mod anthropic;
pub mod gemini;
pub mod repair;

const HTTP_TIMEOUT: Duration = Duration::from_secs(120);
pub(crate) const MAX_TOKENS: u32 = 4096;
pub(crate) const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A model backend. Takes a user prompt plus a system prompt and returns the
/// raw response text. Implementations own their retry policy.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError>;

    /// Short backend label recorded on evaluations ("claude", "gemini").
    fn name(&self) -> &'static str;
}

/// Constructs the provider selected by `LLM_PROVIDER`, requiring the
/// matching API key variable.
pub fn provider_from_config(config: &Config) -> Result<Arc<dyn LlmProvider>> {
    match config.llm_provider.as_str() {
        "claude" | "anthropic" => {
            let key = config
                .anthropic_api_key
                .clone()
                .context("ANTHROPIC_API_KEY is required when LLM_PROVIDER=claude")?;
            Ok(Arc::new(anthropic::AnthropicProvider::new(key)))
        }
        "gemini" => {
            let key = config
                .gemini_api_key
                .clone()
                .context("GEMINI_API_KEY is required when LLM_PROVIDER=gemini")?;
            Ok(Arc::new(gemini::GeminiProvider::new(key)))
        }
        other => bail!("Unknown LLM_PROVIDER '{other}' (expected 'claude' or 'gemini')"),
    }
}

pub(crate) fn build_http_client() -> Client {
    Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .expect("Failed to build HTTP client")
}

/// Exponential backoff: 1s, 2s, 4s
pub(crate) fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(1000 * (1 << (attempt - 1)))
}
