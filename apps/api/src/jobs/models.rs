use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub department: String,
    pub location: String,
    pub description: Option<String>,
    pub required_skills: Vec<String>,
    pub applicants: u32,
    pub matched_candidates: u32,
    pub top_candidates: u32,
    /// Human-readable age such as "3 days ago".
    pub posted_date: String,
    pub posted_at: DateTime<Utc>,
}

/// A validated posting that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub title: String,
    pub department: String,
    pub location: String,
    pub description: Option<String>,
    pub required_skills: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobSort {
    #[default]
    Recent,
    Applicants,
    Matches,
}

/// Query string of `GET /api/v1/jobs`.
#[derive(Debug, Clone, Deserialize)]
pub struct JobFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default = "default_department")]
    pub department: String,
    #[serde(default)]
    pub sort: JobSort,
}

fn default_department() -> String {
    "all".to_string()
}

impl Default for JobFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            department: default_department(),
            sort: JobSort::default(),
        }
    }
}
