mod analysis_client;
mod auth;
mod candidates;
mod config;
mod db;
mod errors;
mod extract;
mod jobs;
mod models;
mod resumes;
mod routes;
mod state;
mod stats;
mod upload;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis_client::HttpAnalysisBackend;
use crate::auth::SessionKeys;
use crate::config::Config;
use crate::db::create_pool;
use crate::jobs::JobBoard;
use crate::routes::build_router;
use crate::state::AppState;

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

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize analysis service client
    let analysis = Arc::new(HttpAnalysisBackend::new(&config.analysis_api_url)?);
    info!("Analysis service client initialized ({})", analysis.base_url());

    // Job board starts from the sample postings every time
    let jobs = JobBoard::seeded(chrono::Utc::now());
    info!("Job board seeded with {} postings", jobs.len());

    let state = AppState {
        db,
        analysis,
        jobs: Arc::new(RwLock::new(jobs)),
        session_keys: SessionKeys::new(&config.session_secret),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the frontend host once it is configurable

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
