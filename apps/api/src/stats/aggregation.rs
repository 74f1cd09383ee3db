//! Summary statistics over whatever candidate set the caller has loaded.
//! Recomputed on every call; nothing is cached.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::candidate::Candidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Outstanding,
    Strong,
    Good,
    Developing,
}

impl ScoreBand {
    pub const ALL: [ScoreBand; 4] = [
        ScoreBand::Outstanding,
        ScoreBand::Strong,
        ScoreBand::Good,
        ScoreBand::Developing,
    ];

    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            ScoreBand::Outstanding
        } else if score >= 80.0 {
            ScoreBand::Strong
        } else if score >= 70.0 {
            ScoreBand::Good
        } else {
            ScoreBand::Developing
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandCount {
    pub band: ScoreBand,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateStats {
    pub total: usize,
    /// Mean score rounded to the nearest integer.
    pub average_score: u32,
    pub max_score: f64,
    pub min_score: f64,
    pub category_counts: BTreeMap<String, usize>,
    /// Share of `total` per category, rounded to a whole percent.
    pub category_percentages: BTreeMap<String, u32>,
    /// Every band, best first, including empty ones.
    pub score_bands: Vec<BandCount>,
}

impl CandidateStats {
    pub fn from_candidates(candidates: &[Candidate]) -> Self {
        let total = candidates.len();

        let mut category_counts: BTreeMap<String, usize> = BTreeMap::new();
        for c in candidates {
            *category_counts.entry(c.category.clone()).or_default() += 1;
        }
        let category_percentages = category_counts
            .iter()
            .map(|(category, count)| (category.clone(), percent(*count, total)))
            .collect();

        let score_bands = ScoreBand::ALL
            .iter()
            .map(|band| BandCount {
                band: *band,
                count: candidates
                    .iter()
                    .filter(|c| ScoreBand::from_score(c.score) == *band)
                    .count(),
            })
            .collect();

        if total == 0 {
            return Self {
                total,
                average_score: 0,
                max_score: 0.0,
                min_score: 0.0,
                category_counts,
                category_percentages,
                score_bands,
            };
        }

        let sum: f64 = candidates.iter().map(|c| c.score).sum();
        let max_score = candidates
            .iter()
            .map(|c| c.score)
            .fold(f64::NEG_INFINITY, f64::max);
        let min_score = candidates
            .iter()
            .map(|c| c.score)
            .fold(f64::INFINITY, f64::min);

        Self {
            total,
            average_score: (sum / total as f64).round().max(0.0) as u32,
            max_score,
            min_score,
            category_counts,
            category_percentages,
            score_bands,
        }
    }
}

fn percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u32
}
