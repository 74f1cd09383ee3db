use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::analysis_client::PageRequest;
use crate::errors::AppError;
use crate::models::candidate::Candidate;

pub const ALL_CATEGORIES: &str = "all";
pub const MAX_PAGE_SIZE: u32 = 100;
const DEFAULT_PAGE_SIZE: u32 = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Score,
    Name,
    Category,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Query string of `GET /api/v1/candidates`.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub search: String,
    /// Category filter: `all` or an exact category label.
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub sort_by: SortKey,
    #[serde(default)]
    pub order: SortOrder,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_role() -> String {
    ALL_CATEGORIES.to_string()
}

impl Default for CandidateQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            search: String::new(),
            role: default_role(),
            sort_by: SortKey::default(),
            order: SortOrder::default(),
        }
    }
}

impl CandidateQuery {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.page < 1 {
            return Err(AppError::Validation("page must be 1 or greater".to_string()));
        }
        validate_limit(self.limit)
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            limit: self.limit,
            search: self.search.trim().to_string(),
            role: self.role.trim().to_string(),
        }
    }
}

/// Listing and leaderboard sizes are capped at 100.
pub fn validate_limit(limit: u32) -> Result<(), AppError> {
    if (1..=MAX_PAGE_SIZE).contains(&limit) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Please enter a number between 1 and {MAX_PAGE_SIZE}"
        )))
    }
}

pub fn is_all(filter: &str) -> bool {
    let filter = filter.trim();
    filter.is_empty() || filter.eq_ignore_ascii_case(ALL_CATEGORIES)
}

/// `all` keeps everything; any other value keeps exact category matches only.
pub fn filter_by_category(candidates: Vec<Candidate>, filter: &str) -> Vec<Candidate> {
    if is_all(filter) {
        return candidates;
    }
    let filter = filter.trim();
    candidates
        .into_iter()
        .filter(|c| c.category == filter)
        .collect()
}

/// Case-insensitive substring match over filename, category, email and resume text.
pub fn matches_search(candidate: &Candidate, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    candidate.filename.to_lowercase().contains(&term)
        || candidate.category.to_lowercase().contains(&term)
        || candidate
            .email
            .as_deref()
            .is_some_and(|e| e.to_lowercase().contains(&term))
        || candidate.extracted.to_lowercase().contains(&term)
}

/// Sorts the loaded subset. Ties fall back to filename so output is stable.
pub fn sort_candidates(candidates: &mut [Candidate], key: SortKey, order: SortOrder) {
    candidates.sort_by(|a, b| {
        let primary = match key {
            SortKey::Score => a.score.total_cmp(&b.score),
            SortKey::Name => a.filename.to_lowercase().cmp(&b.filename.to_lowercase()),
            SortKey::Category => a.category.to_lowercase().cmp(&b.category.to_lowercase()),
        };
        let primary = match order {
            SortOrder::Asc => primary,
            SortOrder::Desc => primary.reverse(),
        };
        match primary {
            Ordering::Equal => a.filename.cmp(&b.filename),
            other => other,
        }
    });
}

/// Search, category filter and sort, in that order, over one loaded page.
pub fn apply_to_loaded(candidates: Vec<Candidate>, query: &CandidateQuery) -> Vec<Candidate> {
    let mut shown: Vec<Candidate> = filter_by_category(candidates, &query.role)
        .into_iter()
        .filter(|c| matches_search(c, &query.search))
        .collect();
    sort_candidates(&mut shown, query.sort_by, query.order);
    shown
}
