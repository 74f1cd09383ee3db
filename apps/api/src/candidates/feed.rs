//! Incremental candidate loading.
//!
//! `CandidateFeed` keeps what has been loaded so far and decides whether another
//! page may be requested. Starting a load and completing it are separate steps so
//! the in-flight flag is observable; the async helpers drive both against an
//! `AnalysisBackend`.

use std::collections::HashSet;

use crate::analysis_client::{AnalysisBackend, AnalysisError, PageRequest};
use crate::models::candidate::{Candidate, CandidatePage};

#[derive(Debug, Clone)]
pub struct CandidateFeed {
    request: PageRequest,
    candidates: Vec<Candidate>,
    seen: HashSet<String>,
    page: u32,
    has_more: bool,
    loading: bool,
    error: Option<String>,
    total: u64,
    total_resumes: Option<u64>,
}

/// A page fetch that has been started and not yet completed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingLoad {
    pub request: PageRequest,
    replace: bool,
}

impl CandidateFeed {
    /// `request.page` is the page `load_first` starts from.
    pub fn new(request: PageRequest) -> Self {
        Self {
            request,
            candidates: Vec::new(),
            seen: HashSet::new(),
            page: 0,
            has_more: true,
            loading: false,
            error: None,
            total: 0,
            total_resumes: None,
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn into_candidates(self) -> Vec<Candidate> {
        self.candidates
    }

    /// Last page successfully loaded; 0 before the first load.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.request.limit
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    #[allow(dead_code)]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[allow(dead_code)]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Size of the whole resume pool as last reported by the analysis service.
    pub fn total_resumes(&self) -> Option<u64> {
        self.total_resumes
    }

    /// Starts a fresh load that will replace whatever is loaded.
    pub fn begin_first(&mut self) -> PendingLoad {
        self.loading = true;
        self.error = None;
        PendingLoad {
            request: PageRequest {
                page: self.request.page.max(1),
                ..self.request.clone()
            },
            replace: true,
        }
    }

    /// Starts loading the next page, or returns `None` when there is nothing more
    /// to load or a load is already in flight.
    pub fn begin_more(&mut self) -> Option<PendingLoad> {
        if !self.has_more || self.loading || self.page == 0 {
            return None;
        }
        self.loading = true;
        Some(PendingLoad {
            request: PageRequest {
                page: self.page + 1,
                ..self.request.clone()
            },
            replace: false,
        })
    }

    /// Applies the outcome of a started load. Returns how many new candidates
    /// were added.
    pub fn complete(
        &mut self,
        pending: PendingLoad,
        outcome: Result<CandidatePage, AnalysisError>,
    ) -> Result<usize, AnalysisError> {
        self.loading = false;
        let page = match outcome {
            Ok(page) => page,
            Err(e) => {
                self.error = Some(e.user_message());
                self.has_more = false;
                return Err(e);
            }
        };

        if pending.replace {
            self.candidates.clear();
            self.seen.clear();
        }

        self.has_more = page_has_more(&page, &pending.request);
        let before = self.candidates.len();
        for candidate in page.candidates {
            if self.seen.insert(candidate.filename.clone()) {
                self.candidates.push(candidate);
            }
        }
        self.page = pending.request.page;
        self.total_resumes = page.total_resumes;
        self.total = match (&page.pagination, page.total_resumes) {
            (Some(meta), _) => meta.total,
            (None, Some(total)) => total,
            (None, None) => self.candidates.len() as u64,
        };

        Ok(self.candidates.len() - before)
    }

    pub async fn load_first(&mut self, backend: &dyn AnalysisBackend) -> Result<usize, AnalysisError> {
        let pending = self.begin_first();
        let outcome = backend.list_candidates(&pending.request).await;
        self.complete(pending, outcome)
    }

    /// Loads the next page if allowed. `Ok(None)` means no request was made.
    pub async fn load_more(
        &mut self,
        backend: &dyn AnalysisBackend,
    ) -> Result<Option<usize>, AnalysisError> {
        let Some(pending) = self.begin_more() else {
            return Ok(None);
        };
        let outcome = backend.list_candidates(&pending.request).await;
        self.complete(pending, outcome).map(Some)
    }

    /// Loads from the first page on until `max` candidates are held or the listing
    /// runs out.
    pub async fn load_up_to(
        &mut self,
        backend: &dyn AnalysisBackend,
        max: usize,
    ) -> Result<(), AnalysisError> {
        self.load_first(backend).await?;
        while self.candidates.len() < max {
            // a page of nothing new would repeat forever
            match self.load_more(backend).await? {
                Some(0) | None => break,
                Some(_) => {}
            }
        }
        self.candidates.truncate(max);
        Ok(())
    }
}

/// Pagination metadata decides when present; otherwise a full page means there
/// may be another one.
fn page_has_more(page: &CandidatePage, request: &PageRequest) -> bool {
    match &page.pagination {
        Some(meta) => request.page < meta.total_pages,
        None => page.candidates.len() as u32 >= request.limit,
    }
}
