use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::analysis_client::AnalysisBackend;
use crate::auth::SessionKeys;
use crate::config::Config;
use crate::jobs::JobBoard;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// External analysis service. `HttpAnalysisBackend` in production.
    pub analysis: Arc<dyn AnalysisBackend>,
    /// Job postings, in memory only. Lost on restart.
    pub jobs: Arc<RwLock<JobBoard>>,
    pub session_keys: SessionKeys,
    pub config: Config,
}

#[cfg(test)]
pub const TEST_SECRET: &str = "test-session-secret";

#[cfg(test)]
impl AppState {
    /// State over a stub backend. The pool is lazy, so tests that never reach the
    /// database need no Postgres.
    pub fn for_tests(analysis: Arc<dyn AnalysisBackend>) -> Self {
        let config = Config {
            database_url: "postgres://localhost/screener_test".to_string(),
            analysis_api_url: "http://localhost:5000".to_string(),
            session_secret: TEST_SECRET.to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            max_upload_bytes: 5 * 1024 * 1024,
            max_request_bytes: 50 * 1024 * 1024,
        };
        let db = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .expect("lazy pool");

        Self {
            db,
            analysis,
            jobs: Arc::new(RwLock::new(JobBoard::seeded(chrono::Utc::now()))),
            session_keys: SessionKeys::new(TEST_SECRET),
            config,
        }
    }
}
