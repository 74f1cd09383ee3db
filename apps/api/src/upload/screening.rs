//! Screening upload: validate a batch of resumes, then forward the accepted ones to
//! the analysis service one at a time.

use serde::Serialize;
use tracing::{info, warn};

use crate::analysis_client::{AnalysisBackend, AnalysisError, ResumeFile};
use crate::errors::AppError;
use crate::models::candidate::{Candidate, FileError};
use crate::upload::form::UploadedPart;
use crate::upload::validation::{validate_file, UploadRejection};

/// Merged result of every analysis call made for one upload request.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningSummary {
    /// Score descending.
    pub candidates: Vec<Candidate>,
    /// Files submitted, including the ones rejected locally.
    pub total_resumes: u64,
    pub processed_resumes: u64,
    pub file_errors: Vec<FileError>,
}

/// Splits parts into forwardable files and local rejections.
/// Nothing here touches the network.
pub fn partition_files(
    parts: Vec<UploadedPart>,
    max_bytes: usize,
) -> (Vec<ResumeFile>, Vec<FileError>) {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for part in parts {
        let display_name = part
            .filename
            .clone()
            .unwrap_or_else(|| "(unnamed)".to_string());
        match validate_file(
            part.filename.as_deref(),
            part.content_type.as_deref(),
            part.bytes.len(),
            max_bytes,
        ) {
            Ok(kind) => accepted.push(ResumeFile {
                filename: display_name,
                content_type: kind.mime().to_string(),
                bytes: part.bytes,
            }),
            Err(rejection) => rejected.push(FileError {
                filename: display_name,
                error: rejection.to_string(),
            }),
        }
    }

    (accepted, rejected)
}

/// Runs one screening upload.
///
/// Every file is validated before the first network call. Accepted files are
/// forwarded sequentially; a failure on one file is recorded in `file_errors` and
/// the rest of the batch still runs. If no file could be forwarded at all, the last
/// upstream error is returned.
pub async fn screen_batch(
    backend: &dyn AnalysisBackend,
    parts: Vec<UploadedPart>,
    job_description: Option<&str>,
    max_bytes: usize,
) -> Result<ScreeningSummary, AppError> {
    if parts.is_empty() {
        return Err(UploadRejection::MissingFile.into());
    }
    let job_description = job_description
        .map(str::trim)
        .filter(|jd| !jd.is_empty())
        .ok_or(UploadRejection::MissingJobDescription)?;

    let total_resumes = parts.len() as u64;
    let (accepted, mut file_errors) = partition_files(parts, max_bytes);

    if accepted.is_empty() {
        let details: Vec<String> = file_errors
            .iter()
            .map(|e| format!("{}: {}", e.filename, e.error))
            .collect();
        return Err(AppError::Validation(format!(
            "No valid resume files ({})",
            details.join("; ")
        )));
    }

    let mut candidates = Vec::new();
    let mut processed_resumes = 0;
    let mut forwarded = 0;
    let mut last_error: Option<AnalysisError> = None;

    for file in accepted {
        let filename = file.filename.clone();
        match backend.analyze(file, job_description).await {
            Ok(batch) => {
                forwarded += 1;
                processed_resumes += batch.processed_resumes;
                candidates.extend(batch.candidates);
                file_errors.extend(batch.file_errors);
            }
            Err(e) => {
                warn!("Analysis of {filename} failed: {e}");
                file_errors.push(FileError {
                    filename,
                    error: e.user_message(),
                });
                last_error = Some(e);
            }
        }
    }

    if forwarded == 0 {
        if let Some(e) = last_error {
            return Err(e.into());
        }
    }

    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    info!(
        "Screening finished: {total_resumes} submitted, {processed_resumes} processed, {} error(s)",
        file_errors.len()
    );

    Ok(ScreeningSummary {
        candidates,
        total_resumes,
        processed_resumes,
        file_errors,
    })
}
