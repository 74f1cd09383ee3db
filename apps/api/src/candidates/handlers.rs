use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis_client::{AnalysisBackend, PageRequest};
use crate::candidates::feed::CandidateFeed;
use crate::candidates::query::{
    apply_to_loaded, validate_limit, CandidateQuery, ALL_CATEGORIES, MAX_PAGE_SIZE,
};
use crate::errors::AppError;
use crate::extract::{ApiPath, ApiQuery};
use crate::models::candidate::Candidate;
use crate::state::AppState;
use crate::stats::aggregation::CandidateStats;

#[derive(Debug, Serialize)]
pub struct CandidateListResponse {
    pub candidates: Vec<Candidate>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub has_more: bool,
    /// Computed over `candidates` as returned, after search and filter.
    pub stats: CandidateStats,
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CandidateQuery>,
) -> Result<Json<CandidateListResponse>, AppError> {
    query.validate()?;

    let mut feed = CandidateFeed::new(query.page_request());
    feed.load_first(state.analysis.as_ref()).await?;

    let page = feed.page();
    let limit = feed.limit();
    let total = feed.total();
    let has_more = feed.has_more();
    let candidates = apply_to_loaded(feed.into_candidates(), &query);

    Ok(Json(CandidateListResponse {
        stats: CandidateStats::from_candidates(&candidates),
        candidates,
        page,
        limit,
        total,
        has_more,
    }))
}

#[derive(Debug, Serialize)]
pub struct TopCandidatesResponse {
    pub candidates: Vec<Candidate>,
}

/// GET /api/v1/candidates/top/:limit
pub async fn handle_top_candidates(
    State(state): State<AppState>,
    ApiPath(limit): ApiPath<u32>,
) -> Result<Json<TopCandidatesResponse>, AppError> {
    validate_limit(limit)?;
    let candidates = state.analysis.top_candidates(limit).await?;
    Ok(Json(TopCandidatesResponse { candidates }))
}

/// First page of 100 candidates, used wherever a candidate is looked up by filename.
async fn load_directory(backend: &dyn AnalysisBackend) -> Result<Vec<Candidate>, AppError> {
    let mut feed = CandidateFeed::new(PageRequest {
        page: 1,
        limit: MAX_PAGE_SIZE,
        search: String::new(),
        role: ALL_CATEGORIES.to_string(),
    });
    feed.load_up_to(backend, MAX_PAGE_SIZE as usize).await?;
    Ok(feed.into_candidates())
}

/// GET /api/v1/candidates/:filename
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    ApiPath(filename): ApiPath<String>,
) -> Result<Json<Candidate>, AppError> {
    load_directory(state.analysis.as_ref())
        .await?
        .into_iter()
        .find(|c| c.filename == filename)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Candidate not found".to_string()))
}

/// GET /api/v1/candidates/:filename/resume
pub async fn handle_download_resume(
    State(state): State<AppState>,
    ApiPath(filename): ApiPath<String>,
) -> Result<Response, AppError> {
    let blob = state.analysis.download_resume(&filename).await?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        header_safe_filename(&blob.filename)
    );

    Ok((
        [
            (header::CONTENT_TYPE, blob.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        blob.bytes,
    )
        .into_response())
}

/// Keeps the filename printable ASCII and free of quotes so it fits a quoted header param.
fn header_safe_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();
    if cleaned.trim().is_empty() {
        "resume".to_string()
    } else {
        cleaned
    }
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub candidate_ids: Vec<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ContactRecipient {
    pub filename: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub message: String,
    pub recipients: Vec<ContactRecipient>,
    /// Requested ids that were not found or have no email address.
    pub skipped: Vec<String>,
}

impl ContactRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.candidate_ids.iter().all(|id| id.trim().is_empty()) {
            return Err(AppError::Validation("No candidates selected".to_string()));
        }
        if self.subject.trim().is_empty() {
            return Err(AppError::Validation("Email subject is required".to_string()));
        }
        if self.message.trim().is_empty() {
            return Err(AppError::Validation("Email message is required".to_string()));
        }
        Ok(())
    }
}

/// Splits requested ids into reachable recipients and skipped ids, keeping request order.
fn resolve_recipients(
    requested: &[String],
    directory: &[Candidate],
) -> (Vec<ContactRecipient>, Vec<String>) {
    let mut recipients = Vec::new();
    let mut skipped = Vec::new();
    for id in requested.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
        if recipients.iter().any(|r: &ContactRecipient| r.filename == id) {
            continue;
        }
        let email = directory
            .iter()
            .find(|c| c.filename == id)
            .and_then(|c| c.email.as_deref())
            .map(str::trim)
            .filter(|e| !e.is_empty());
        match email {
            Some(email) => recipients.push(ContactRecipient {
                filename: id.to_string(),
                email: email.to_string(),
            }),
            None => skipped.push(id.to_string()),
        }
    }
    (recipients, skipped)
}

/// POST /api/v1/candidates/contact
///
/// Resolves who would be emailed. No mail is sent from here.
pub async fn handle_contact(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> Result<Json<ContactResponse>, AppError> {
    request.validate()?;

    let directory = load_directory(state.analysis.as_ref()).await?;
    let (recipients, skipped) = resolve_recipients(&request.candidate_ids, &directory);
    if recipients.is_empty() {
        return Err(AppError::Validation(
            "None of the selected candidates has an email address".to_string(),
        ));
    }

    info!(
        "Contact prepared for {} candidate(s), {} skipped",
        recipients.len(),
        skipped.len()
    );
    Ok(Json(ContactResponse {
        message: format!("Message ready for {} candidate(s)", recipients.len()),
        recipients,
        skipped,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis_client::stub::candidate;

    #[test]
    fn test_header_safe_filename() {
        assert_eq!(header_safe_filename("jane doe.pdf"), "jane doe.pdf");
        assert_eq!(header_safe_filename("a\"b.pdf"), "a_b.pdf");
        assert_eq!(header_safe_filename("résumé.pdf"), "r_sum_.pdf");
        assert_eq!(header_safe_filename(""), "resume");
    }

    #[test]
    fn test_contact_request_validation_messages() {
        let mut req = ContactRequest {
            candidate_ids: vec![],
            subject: "Interview".to_string(),
            message: "Hello".to_string(),
        };
        assert!(matches!(req.validate(), Err(AppError::Validation(ref m)) if m == "No candidates selected"));

        req.candidate_ids = vec!["a.pdf".to_string()];
        req.subject = " ".to_string();
        assert!(matches!(req.validate(), Err(AppError::Validation(ref m)) if m == "Email subject is required"));

        req.subject = "Interview".to_string();
        req.message = String::new();
        assert!(matches!(req.validate(), Err(AppError::Validation(ref m)) if m == "Email message is required"));
    }

    #[test]
    fn test_resolve_recipients_skips_unknown_and_emailless() {
        let mut no_email = candidate("ghost.pdf", "HR", 50.0);
        no_email.email = None;
        let directory = vec![candidate("ann.pdf", "HR", 80.0), no_email];

        let (recipients, skipped) = resolve_recipients(
            &[
                "ann.pdf".to_string(),
                "ann.pdf".to_string(),
                "ghost.pdf".to_string(),
                "missing.pdf".to_string(),
            ],
            &directory,
        );

        assert_eq!(
            recipients,
            vec![ContactRecipient {
                filename: "ann.pdf".to_string(),
                email: "ann@example.com".to_string(),
            }]
        );
        assert_eq!(skipped, vec!["ghost.pdf", "missing.pdf"]);
    }
}
