pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::{self, require_session};
use crate::candidates::handlers as candidates;
use crate::jobs::handlers as jobs;
use crate::resumes::handlers as resumes;
use crate::state::AppState;
use crate::stats::handlers as stats;
use crate::upload::handlers as upload;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_request_bytes);

    // Everything here needs a signed-in user; handlers read `Extension<Session>`.
    let protected = Router::new()
        .route(
            "/api/v1/screenings",
            post(upload::handle_screening_upload).layer(upload_limit),
        )
        .route(
            "/api/v1/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_create_resume),
        )
        .route(
            "/api/v1/resumes/upload",
            post(resumes::handle_upload_resume).layer(upload_limit),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get_resume)
                .patch(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        .route(
            "/api/v1/resumes/:id/analyses",
            get(resumes::handle_list_analyses),
        )
        .route("/api/v1/analyses", post(resumes::handle_create_analysis))
        .route(
            "/api/v1/analyses/:id",
            get(resumes::handle_get_analysis)
                .patch(resumes::handle_update_analysis)
                .delete(resumes::handle_delete_analysis),
        )
        .route(
            "/api/v1/companies/:id/analyses",
            get(resumes::handle_company_analyses),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/session/access",
            get(auth::handlers::handle_route_access),
        )
        // Candidate directory
        .route("/api/v1/candidates", get(candidates::handle_list_candidates))
        .route(
            "/api/v1/top-candidates/:limit",
            get(candidates::handle_top_candidates),
        )
        .route("/api/v1/contact", post(candidates::handle_contact))
        .route(
            "/api/v1/candidates/:filename",
            get(candidates::handle_get_candidate),
        )
        .route(
            "/api/v1/candidates/:filename/resume",
            get(candidates::handle_download_resume),
        )
        // Aggregation views
        .route("/api/v1/dashboard", get(stats::handle_dashboard))
        .route("/api/v1/leaderboard", get(stats::handle_leaderboard))
        // Job board
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job).delete(jobs::handle_delete_job),
        )
        .merge(protected)
        .with_state(state)
}
