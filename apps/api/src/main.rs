mod config;
mod db;
mod errors;
mod evaluation;
mod jobs;
mod llm_client;
mod models;
mod routes;
mod rubric;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::jobs::file_store::FileJobStore;
use crate::llm_client::provider_from_config;
use crate::routes::build_router;
use crate::rubric::defaults::seed_default_rubric;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (panics on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Veraison API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Seed the built-in tasting-room rubric on first boot
    seed_default_rubric(&db).await?;

    // Initialize LLM provider (Claude by default — swap via LLM_PROVIDER)
    let llm = provider_from_config(&config)?;
    info!("LLM provider initialized: {}", llm.name());

    // Initialize the file-backed job store for background analysis
    let jobs = Arc::new(FileJobStore::from_config(&config));

    // Build app state
    let state = AppState { db, llm, jobs };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
