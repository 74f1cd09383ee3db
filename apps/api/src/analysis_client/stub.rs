//! In-memory `AnalysisBackend` for tests. Behaves like the analysis service's
//! listing endpoints and counts every call so tests can assert what hit the wire.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use super::{AnalysisBackend, AnalysisError, PageRequest, ResumeBlob, ResumeFile};
use crate::models::candidate::{AnalysisBatch, Candidate, CandidatePage, PaginationMeta};

#[derive(Default)]
pub struct StubBackend {
    pub candidates: Vec<Candidate>,
    /// Filenames whose analysis call fails with a 500.
    pub failing_uploads: HashSet<String>,
    /// When set, every listing call fails with this status.
    pub listing_status: Option<u16>,
    pub analyze_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub analyzed: Mutex<Vec<String>>,
}

pub fn candidate(filename: &str, category: &str, score: f64) -> Candidate {
    Candidate {
        filename: filename.to_string(),
        extracted: format!("Resume text of {filename}"),
        preprocessed: String::new(),
        email: Some(format!("{}@example.com", filename.trim_end_matches(".pdf"))),
        phone: None,
        category: category.to_string(),
        score,
    }
}

impl StubBackend {
    pub fn with_candidates(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            ..Default::default()
        }
    }

    pub fn analyze_count(&self) -> usize {
        self.analyze_calls.load(Ordering::SeqCst)
    }

    pub fn list_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisBackend for StubBackend {
    async fn analyze(
        &self,
        file: ResumeFile,
        _job_description: &str,
    ) -> Result<AnalysisBatch, AnalysisError> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut analyzed) = self.analyzed.lock() {
            analyzed.push(file.filename.clone());
        }

        if self.failing_uploads.contains(&file.filename) {
            return Err(AnalysisError::Api {
                status: 500,
                message: format!("Error processing {}", file.filename),
            });
        }

        let score = self
            .candidates
            .iter()
            .find(|c| c.filename == file.filename)
            .map(|c| c.score)
            .unwrap_or(70.0);

        Ok(AnalysisBatch {
            candidates: vec![candidate(&file.filename, "General", score)],
            total_resumes: 1,
            processed_resumes: 1,
            file_errors: vec![],
        })
    }

    async fn list_candidates(&self, request: &PageRequest) -> Result<CandidatePage, AnalysisError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.listing_status {
            return Err(AnalysisError::Api {
                status,
                message: "listing unavailable".to_string(),
            });
        }

        let search = request.search.to_lowercase();
        let role = request.role.to_lowercase();
        let matching: Vec<Candidate> = self
            .candidates
            .iter()
            .filter(|c| search.is_empty() || c.filename.to_lowercase().contains(&search))
            .filter(|c| role.is_empty() || role == "all" || c.category.to_lowercase().contains(&role))
            .cloned()
            .collect();

        let limit = request.limit.max(1);
        let total = matching.len() as u64;
        let total_pages = (matching.len() as u32).div_ceil(limit);
        let offset = ((request.page.max(1) - 1) * limit) as usize;

        Ok(CandidatePage {
            candidates: matching.into_iter().skip(offset).take(limit as usize).collect(),
            total_resumes: Some(self.candidates.len() as u64),
            pagination: Some(PaginationMeta {
                page: request.page,
                limit,
                total,
                total_pages,
            }),
        })
    }

    async fn top_candidates(&self, limit: u32) -> Result<Vec<Candidate>, AnalysisError> {
        let mut sorted = self.candidates.clone();
        sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
        sorted.truncate(limit as usize);
        Ok(sorted)
    }

    async fn download_resume(&self, filename: &str) -> Result<ResumeBlob, AnalysisError> {
        self.candidates
            .iter()
            .find(|c| c.filename == filename)
            .map(|c| ResumeBlob {
                filename: c.filename.clone(),
                content_type: "application/pdf".to_string(),
                bytes: Bytes::from(c.extracted.clone().into_bytes()),
            })
            .ok_or_else(|| AnalysisError::Api {
                status: 404,
                message: "Resume not found".to_string(),
            })
    }
}
