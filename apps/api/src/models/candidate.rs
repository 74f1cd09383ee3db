use serde::{Deserialize, Serialize};

/// A parsed resume as returned by the analysis service. Read-only on this side.
///
/// `filename` doubles as the identifier: the analysis service keys everything
/// (detail lookup, resume download) by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub filename: String,
    #[serde(default)]
    pub extracted: String,
    #[serde(default)]
    pub preprocessed: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub category: String,
    /// Match score, 0 – 100.
    #[serde(default)]
    pub score: f64,
}

/// Pagination block of a candidate listing. The analysis service has shipped both
/// snake_case and camelCase spellings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationMeta {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default, alias = "totalCandidates", alias = "total_candidates")]
    pub total: u64,
    #[serde(default, alias = "totalPages")]
    pub total_pages: u32,
}

/// One page of `GET /api/candidates`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidatePage {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub total_resumes: Option<u64>,
    #[serde(default)]
    pub pagination: Option<PaginationMeta>,
}

/// A per-file failure reported either by local validation or by the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileError {
    pub filename: String,
    pub error: String,
}

/// Response of the analysis service's upload endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisBatch {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub total_resumes: u64,
    #[serde(default)]
    pub processed_resumes: u64,
    #[serde(default)]
    pub file_errors: Vec<FileError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_candidate_tolerates_missing_optional_fields() {
        let c: Candidate = serde_json::from_value(json!({
            "filename": "jane.pdf",
            "category": "Data Science",
            "score": 91.0,
            "email": null
        }))
        .unwrap();
        assert_eq!(c.filename, "jane.pdf");
        assert!(c.email.is_none());
        assert!(c.extracted.is_empty());
    }

    #[test]
    fn test_pagination_accepts_camel_case() {
        let page: CandidatePage = serde_json::from_value(json!({
            "candidates": [],
            "pagination": {"page": 2, "limit": 10, "totalCandidates": 30, "totalPages": 3}
        }))
        .unwrap();
        let meta = page.pagination.unwrap();
        assert_eq!(meta.total, 30);
        assert_eq!(meta.total_pages, 3);
    }
}
