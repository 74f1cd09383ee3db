use axum::{
    extract::State,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis_client::PageRequest;
use crate::candidates::feed::CandidateFeed;
use crate::candidates::query::{
    filter_by_category, matches_search, validate_limit, ALL_CATEGORIES, MAX_PAGE_SIZE,
};
use crate::errors::AppError;
use crate::extract::ApiQuery;
use crate::models::candidate::Candidate;
use crate::state::AppState;
use crate::stats::aggregation::CandidateStats;
use crate::stats::leaderboard::{rank_candidates, RankedCandidate};

const DASHBOARD_TOP: u32 = 5;

#[derive(Debug, Serialize)]
pub struct DashboardAnalytics {
    /// Candidates loaded for the analytics window (at most 100).
    pub total_candidates: usize,
    pub total_resumes: u64,
    pub active_jobs: usize,
    pub average_score: u32,
    pub stats: CandidateStats,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub top_candidates: Vec<Candidate>,
    pub analytics: DashboardAnalytics,
}

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, AppError> {
    let backend = state.analysis.as_ref();
    let top_candidates = backend.top_candidates(DASHBOARD_TOP).await?;

    let mut feed = CandidateFeed::new(PageRequest {
        page: 1,
        limit: MAX_PAGE_SIZE,
        search: String::new(),
        role: ALL_CATEGORIES.to_string(),
    });
    feed.load_up_to(backend, MAX_PAGE_SIZE as usize).await?;

    let stats = CandidateStats::from_candidates(feed.candidates());
    let active_jobs = state.jobs.read().await.len();

    Ok(Json(DashboardResponse {
        top_candidates,
        analytics: DashboardAnalytics {
            total_candidates: stats.total,
            total_resumes: feed.total_resumes().unwrap_or(feed.total()),
            active_jobs,
            average_score: stats.average_score,
            stats,
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default = "default_leaderboard_limit")]
    pub limit: u32,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub role: String,
}

fn default_leaderboard_limit() -> u32 {
    10
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub entries: Vec<RankedCandidate>,
    pub stats: CandidateStats,
}

/// GET /api/v1/leaderboard
///
/// Ranks within the first 100 candidates that match `search` and `role`.
pub async fn handle_leaderboard(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    validate_limit(params.limit)?;

    let mut feed = CandidateFeed::new(PageRequest {
        page: 1,
        limit: MAX_PAGE_SIZE,
        search: params.search.trim().to_string(),
        role: params.role.trim().to_string(),
    });
    feed.load_up_to(state.analysis.as_ref(), MAX_PAGE_SIZE as usize).await?;

    let pool: Vec<Candidate> = filter_by_category(feed.into_candidates(), &params.role)
        .into_iter()
        .filter(|c| matches_search(c, &params.search))
        .collect();
    let entries = rank_candidates(pool, params.limit)?;
    info!("Leaderboard built with {} entries", entries.len());

    let ranked: Vec<Candidate> = entries.iter().map(|e| e.candidate.clone()).collect();
    Ok(Json(LeaderboardResponse {
        stats: CandidateStats::from_candidates(&ranked),
        entries,
    }))
}
