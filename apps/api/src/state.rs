use std::sync::Arc;

use sqlx::PgPool;

use crate::jobs::JobStore;
use crate::llm_client::LlmProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Pluggable LLM backend. Default: Claude. Swap via LLM_PROVIDER env.
    pub llm: Arc<dyn LlmProvider>,
    /// Ephemeral job records for background analysis, polled by the client.
    pub jobs: Arc<dyn JobStore>,
}
