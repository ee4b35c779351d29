mod config;
mod db;
mod errors;
mod extract;
mod graph;
mod models;
mod routes;
mod sentiment;
mod similarity;
mod social;
mod state;
mod store;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{GraphStore, PgGraphStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Sentigraph v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (retries with backoff, then fatal)
    let pool = create_pool(&config)
        .await
        .context("Failed to initialize graph store connection")?;
    let pg_store = PgGraphStore::new(pool);
    pg_store.migrate().await?;
    let store: Arc<dyn GraphStore> = Arc::new(pg_store);

    info!(
        threshold = config.similarity_threshold,
        policy = ?config.corpus_policy,
        "Similarity recomputation configured"
    );

    let state = AppState::new(store.clone(), config.clone());

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
