use serde::Serialize;

use crate::candidates::query::validate_limit;
use crate::errors::AppError;
use crate::models::candidate::Candidate;
use crate::stats::aggregation::ScoreBand;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    /// 1-based.
    pub rank: usize,
    pub band: ScoreBand,
    #[serde(flatten)]
    pub candidate: Candidate,
}

/// Orders by score descending, ties by filename, and keeps the first `limit`.
pub fn rank_candidates(
    mut candidates: Vec<Candidate>,
    limit: u32,
) -> Result<Vec<RankedCandidate>, AppError> {
    validate_limit(limit)?;

    candidates.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.filename.cmp(&b.filename))
    });

    Ok(candidates
        .into_iter()
        .take(limit as usize)
        .enumerate()
        .map(|(i, candidate)| RankedCandidate {
            rank: i + 1,
            band: ScoreBand::from_score(candidate.score),
            candidate,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis_client::stub::candidate;

    #[test]
    fn test_ranks_by_score_then_filename() {
        let ranked = rank_candidates(
            vec![
                candidate("zoe.pdf", "HR", 81.0),
                candidate("adam.pdf", "HR", 81.0),
                candidate("max.pdf", "HR", 93.0),
            ],
            10,
        )
        .unwrap();

        let order: Vec<(usize, &str)> = ranked
            .iter()
            .map(|r| (r.rank, r.candidate.filename.as_str()))
            .collect();
        assert_eq!(order, vec![(1, "max.pdf"), (2, "adam.pdf"), (3, "zoe.pdf")]);
        assert_eq!(ranked[0].band, ScoreBand::Outstanding);
        assert_eq!(ranked[1].band, ScoreBand::Strong);
    }

    #[test]
    fn test_limit_truncates() {
        let ranked = rank_candidates(
            (0..20)
                .map(|i| candidate(&format!("{i}.pdf"), "X", i as f64))
                .collect(),
            5,
        )
        .unwrap();
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].candidate.score, 19.0);
    }

    #[test]
    fn test_out_of_range_limit_is_rejected() {
        for limit in [0, 101] {
            let err = rank_candidates(vec![], limit).unwrap_err();
            assert!(
                matches!(err, AppError::Validation(ref m) if m == "Please enter a number between 1 and 100")
            );
        }
    }

    #[test]
    fn test_serialized_entry_is_flat() {
        let ranked = rank_candidates(vec![candidate("a.pdf", "HR", 72.0)], 1).unwrap();
        let json = serde_json::to_value(&ranked[0]).unwrap();
        assert_eq!(json["rank"], 1);
        assert_eq!(json["band"], "good");
        assert_eq!(json["filename"], "a.pdf");
    }
}
