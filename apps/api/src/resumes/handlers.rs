use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::info;
use uuid::Uuid;

use crate::auth::{Role, Session};
use crate::errors::AppError;
use crate::extract::ApiPath;
use crate::models::resume::{AnalysisRow, ResumeRow};
use crate::resumes::input::{AnalysisInput, AnalysisPatch, ResumeInput, ResumePatch};
use crate::resumes::repository::{self, CompanyAnalysisRow, ResumeWithAnalyses};
use crate::state::AppState;
use crate::upload::form::read_upload_form;
use crate::upload::text::extract_text;
use crate::upload::validation::{validate_file, UploadRejection};

/// Roles allowed to read analyses across a whole company.
const COMPANY_VIEW_ROLES: &[Role] = &[Role::Admin, Role::Recruiter, Role::Manager];

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(input): Json<ResumeInput>,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    let row = repository::create_resume(&state.db, session.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// POST /api/v1/resumes/upload
///
/// Stores one uploaded file as a library resume, with its extracted text as content.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    let form = read_upload_form(multipart).await?;
    let part = form
        .files
        .into_iter()
        .next()
        .ok_or(UploadRejection::MissingFile)?;

    let kind = validate_file(
        part.filename.as_deref(),
        part.content_type.as_deref(),
        part.bytes.len(),
        state.config.max_upload_bytes,
    )?;
    let title = part.filename.unwrap_or_default();
    let content = extract_text(kind, part.bytes).await?;
    info!(
        "Library upload '{title}' ({}) extracted {} chars",
        kind.mime(),
        content.len()
    );

    let input = ResumeInput {
        title,
        content,
        file_type: Some(kind.mime().to_string()),
        company_id: None,
    };
    let row = repository::create_resume(&state.db, session.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<ResumeWithAnalyses>>, AppError> {
    Ok(Json(
        repository::list_resumes(&state.db, session.user_id).await?,
    ))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ResumeWithAnalyses>, AppError> {
    Ok(Json(
        repository::get_resume(&state.db, session.user_id, id).await?,
    ))
}

/// PATCH /api/v1/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ApiPath(id): ApiPath<Uuid>,
    Json(patch): Json<ResumePatch>,
) -> Result<Json<ResumeRow>, AppError> {
    Ok(Json(
        repository::update_resume(&state.db, session.user_id, id, &patch).await?,
    ))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    repository::delete_resume(&state.db, session.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/resumes/:id/analyses
pub async fn handle_list_analyses(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ApiPath(resume_id): ApiPath<Uuid>,
) -> Result<Json<Vec<AnalysisRow>>, AppError> {
    Ok(Json(
        repository::list_analyses(&state.db, session.user_id, resume_id).await?,
    ))
}

/// POST /api/v1/analyses
pub async fn handle_create_analysis(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(input): Json<AnalysisInput>,
) -> Result<(StatusCode, Json<AnalysisRow>), AppError> {
    let row = repository::create_analysis(&state.db, session.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/analyses/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<AnalysisRow>, AppError> {
    Ok(Json(
        repository::get_analysis(&state.db, session.user_id, id).await?,
    ))
}

/// PATCH /api/v1/analyses/:id
pub async fn handle_update_analysis(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ApiPath(id): ApiPath<Uuid>,
    Json(patch): Json<AnalysisPatch>,
) -> Result<Json<AnalysisRow>, AppError> {
    Ok(Json(
        repository::update_analysis(&state.db, session.user_id, id, &patch).await?,
    ))
}

/// DELETE /api/v1/analyses/:id
pub async fn handle_delete_analysis(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    repository::delete_analysis(&state.db, session.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/companies/:id/analyses
pub async fn handle_company_analyses(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ApiPath(company_id): ApiPath<Uuid>,
) -> Result<Json<Vec<CompanyAnalysisRow>>, AppError> {
    session.require_any(COMPANY_VIEW_ROLES)?;
    Ok(Json(
        repository::company_analyses(&state.db, company_id).await?,
    ))
}
