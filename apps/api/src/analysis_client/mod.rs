/// Analysis client: the single point of entry for calls to the external resume
/// analysis service.
///
/// The service does the extraction, categorisation and scoring. This module only
/// moves files and JSON across the wire. Calls are made once: no retry, no backoff.
use anyhow::{bail, Context};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart, Client, Response, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::candidate::{AnalysisBatch, Candidate, CandidatePage};

#[cfg(test)]
pub mod stub;

const REQUEST_TIMEOUT_SECS: u64 = 120;
const FALLBACK_MESSAGE: &str = "The analysis service request failed";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Analysis service base URL cannot carry a path")]
    InvalidBaseUrl,
}

impl AnalysisError {
    /// Message suitable for showing to an end user: the server's own message when it
    /// sent one, otherwise a generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            AnalysisError::Http(e) if e.is_timeout() => {
                "The analysis service did not respond in time".to_string()
            }
            AnalysisError::Http(_) => "Could not reach the analysis service".to_string(),
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }
}

/// A resume file that passed local validation and is ready to forward.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Raw resume bytes served back by the analysis service.
#[derive(Debug, Clone)]
pub struct ResumeBlob {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Query for one page of the remote candidate listing.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
    pub search: String,
    pub role: String,
}

/// The analysis service as seen by handlers. Implemented over HTTP in production and
/// by a stub in tests.
///
/// Carried in `AppState` as `Arc<dyn AnalysisBackend>`.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn analyze(
        &self,
        file: ResumeFile,
        job_description: &str,
    ) -> Result<AnalysisBatch, AnalysisError>;

    async fn list_candidates(&self, request: &PageRequest) -> Result<CandidatePage, AnalysisError>;

    async fn top_candidates(&self, limit: u32) -> Result<Vec<Candidate>, AnalysisError>;

    async fn download_resume(&self, filename: &str) -> Result<ResumeBlob, AnalysisError>;
}

/// The service sometimes wraps the top-candidates list and sometimes does not.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TopCandidatesResponse {
    Wrapped { candidates: Vec<Candidate> },
    Bare(Vec<Candidate>),
}

impl TopCandidatesResponse {
    fn into_candidates(self) -> Vec<Candidate> {
        match self {
            TopCandidatesResponse::Wrapped { candidates } => candidates,
            TopCandidatesResponse::Bare(candidates) => candidates,
        }
    }
}

/// reqwest-backed client for the analysis service.
#[derive(Clone)]
pub struct HttpAnalysisBackend {
    client: Client,
    base_url: Url,
}

impl HttpAnalysisBackend {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("ANALYSIS_API_URL '{base_url}' is not a valid URL"))?;
        if base_url.cannot_be_a_base() {
            bail!("ANALYSIS_API_URL '{base_url}' cannot be used as a base URL");
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, AnalysisError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AnalysisError::InvalidBaseUrl)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisBackend {
    async fn analyze(
        &self,
        file: ResumeFile,
        job_description: &str,
    ) -> Result<AnalysisBatch, AnalysisError> {
        let url = self.endpoint(&["api", "upload"])?;
        let filename = file.filename.clone();

        let part = multipart::Part::bytes(file.bytes.to_vec())
            .file_name(file.filename)
            .mime_str(&file.content_type)?;
        let form = multipart::Form::new()
            .part("files", part)
            .text("job_description", job_description.to_string());

        let response = self.client.post(url).multipart(form).send().await?;
        let batch: AnalysisBatch = ensure_success(response).await?.json().await?;

        debug!(
            "Analysis of {filename} returned {} candidate(s), {} file error(s)",
            batch.candidates.len(),
            batch.file_errors.len()
        );
        Ok(batch)
    }

    async fn list_candidates(&self, request: &PageRequest) -> Result<CandidatePage, AnalysisError> {
        let url = self.endpoint(&["api", "candidates"])?;
        let response = self
            .client
            .get(url)
            .query(&[
                ("page", request.page.to_string()),
                ("limit", request.limit.to_string()),
                ("search", request.search.clone()),
                ("role", request.role.clone()),
            ])
            .send()
            .await?;

        let page: CandidatePage = ensure_success(response).await?.json().await?;
        debug!(
            "Candidate page {} returned {} record(s)",
            request.page,
            page.candidates.len()
        );
        Ok(page)
    }

    async fn top_candidates(&self, limit: u32) -> Result<Vec<Candidate>, AnalysisError> {
        let limit = limit.to_string();
        let url = self.endpoint(&["api", "top-candidates", limit.as_str()])?;
        let response = self.client.get(url).send().await?;
        let body = ensure_success(response).await?.bytes().await?;
        let parsed: TopCandidatesResponse = serde_json::from_slice(&body)?;
        Ok(parsed.into_candidates())
    }

    async fn download_resume(&self, filename: &str) -> Result<ResumeBlob, AnalysisError> {
        let url = self.endpoint(&["api", "resume", filename])?;
        let response = ensure_success(self.client.get(url).send().await?).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response.bytes().await?;

        Ok(ResumeBlob {
            filename: filename.to_string(),
            content_type,
            bytes,
        })
    }
}

/// Passes 2xx responses through; turns anything else into `AnalysisError::Api`
/// carrying the best message the body offers.
async fn ensure_success(response: Response) -> Result<Response, AnalysisError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!("Analysis service returned {}: {}", status, body);
    Err(AnalysisError::Api {
        status: status.as_u16(),
        message: extract_error_message(&body, status),
    })
}

/// Pulls a human-readable message out of an error body.
///
/// Accepts `{"error": "..."}`, `{"message": "..."}` and `{"error": {"message": "..."}}`;
/// falls back to the raw body, then to the status reason.
fn extract_error_message(body: &str, status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let message = value
            .get("error")
            .and_then(|e| e.as_str().or_else(|| e.get("message").and_then(|m| m.as_str())))
            .or_else(|| value.get("message").and_then(|m| m.as_str()));
        if let Some(message) = message {
            return message.to_string();
        }
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_error_string() {
        let msg = extract_error_message(r#"{"error": "No file provided"}"#, StatusCode::BAD_REQUEST);
        assert_eq!(msg, "No file provided");
    }

    #[test]
    fn test_error_message_from_nested_error() {
        let msg = extract_error_message(
            r#"{"error": {"code": "X", "message": "bad pdf"}}"#,
            StatusCode::UNPROCESSABLE_ENTITY,
        );
        assert_eq!(msg, "bad pdf");
    }

    #[test]
    fn test_error_message_falls_back_to_body_then_reason() {
        assert_eq!(
            extract_error_message("upstream exploded", StatusCode::INTERNAL_SERVER_ERROR),
            "upstream exploded"
        );
        assert_eq!(
            extract_error_message("", StatusCode::SERVICE_UNAVAILABLE),
            "Service Unavailable"
        );
    }

    #[test]
    fn test_endpoint_percent_encodes_filename() {
        let backend = HttpAnalysisBackend::new("http://localhost:5000/").unwrap();
        let url = backend
            .endpoint(&["api", "resume", "jane doe/cv.pdf"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/resume/jane%20doe%2Fcv.pdf"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let backend = HttpAnalysisBackend::new("http://analysis.internal/v2").unwrap();
        let url = backend.endpoint(&["api", "top-candidates", "5"]).unwrap();
        assert_eq!(url.as_str(), "http://analysis.internal/v2/api/top-candidates/5");
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(HttpAnalysisBackend::new("mailto:hr@example.com").is_err());
    }

    #[test]
    fn test_top_candidates_accepts_both_shapes() {
        let wrapped: TopCandidatesResponse =
            serde_json::from_str(r#"{"candidates": [{"filename": "a.pdf", "score": 90}]}"#).unwrap();
        let bare: TopCandidatesResponse =
            serde_json::from_str(r#"[{"filename": "b.pdf", "score": 80}]"#).unwrap();
        assert_eq!(wrapped.into_candidates()[0].filename, "a.pdf");
        assert_eq!(bare.into_candidates()[0].filename, "b.pdf");
    }

    #[test]
    fn test_user_message_prefers_server_message() {
        let err = AnalysisError::Api {
            status: 500,
            message: "classifier unavailable".to_string(),
        };
        assert_eq!(err.user_message(), "classifier unavailable");

        let blank = AnalysisError::Api {
            status: 500,
            message: "  ".to_string(),
        };
        assert_eq!(blank.user_message(), FALLBACK_MESSAGE);
    }
}
