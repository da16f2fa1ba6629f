use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Panics at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Which LLM backend to use: "claude" (default) or "gemini".
    pub llm_provider: String,
    pub anthropic_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    /// Directory for job-status files. Defaults to a subdirectory of the
    /// system temp dir when unset.
    pub job_dir: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            llm_provider: std::env::var("LLM_PROVIDER").unwrap_or_else(|_| "claude".to_string()),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            job_dir: optional_env("JOB_DIR").map(PathBuf::from),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Returns None for unset or empty variables so blank keys in .env files
/// do not masquerade as configured providers.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
