mod catalog;
mod config;
mod db;
mod errors;
mod llm_client;
mod middleware;
mod models;
mod properties;
mod recommendation;
mod reservations;
mod routes;
mod state;
mod users;

use anyhow::Result;
use axum::middleware::from_fn;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::catalog::postgres::PgCatalogStore;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::middleware::request_id::{propagate_request_id, request_span};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http=info",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting booking API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs pending migrations)
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client
    let llm = LlmClient::new(&config)?;
    info!(
        "LLM client initialized (model: {}, timeout: {}s, attempts: {})",
        llm.model(),
        config.llm_timeout_secs,
        config.llm_max_attempts
    );

    let state = AppState {
        store: Arc::new(PgCatalogStore::new(db)),
        llm: Arc::new(llm),
    };

    // Request id runs before tracing so the span can read it.
    let app = build_router(state)
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(from_fn(propagate_request_id))
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
