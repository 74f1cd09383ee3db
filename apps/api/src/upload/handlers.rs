use axum::{
    extract::{Multipart, State},
    Extension, Json,
};
use tracing::info;

use crate::auth::Session;
use crate::errors::AppError;
use crate::state::AppState;
use crate::upload::form::read_upload_form;
use crate::upload::screening::{screen_batch, ScreeningSummary};

/// POST /api/v1/screenings
///
/// Multipart: one or more resumes under `files` (or `file`) plus `job_description`.
/// Files are validated locally, then forwarded one by one to the analysis service.
pub async fn handle_screening_upload(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    multipart: Multipart,
) -> Result<Json<ScreeningSummary>, AppError> {
    let form = read_upload_form(multipart).await?;
    info!(
        "User {} ({}) submitted {} resume(s) for screening",
        session.user_id,
        session.email,
        form.files.len()
    );

    let summary = screen_batch(
        state.analysis.as_ref(),
        form.files,
        form.job_description.as_deref(),
        state.config.max_upload_bytes,
    )
    .await?;

    Ok(Json(summary))
}
