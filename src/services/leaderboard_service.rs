//! Ranking of completed responses

use std::cmp::Ordering;

use crate::{
    config::TiePolicy,
    models::{LeaderboardEntry, Response},
    utils::stats::round1,
};

/// Leaderboard computation. A pure view over a quiz's responses.
pub struct LeaderboardService;

impl LeaderboardService {
    /// Rank every finished response; in-progress ones are ignored.
    ///
    /// Order: score descending, total time ascending, completion time
    /// ascending, then completion sequence. Ranks are 1-based and dense.
    /// Under [`TiePolicy::Shared`] only identical (score, time, completion
    /// time) triples share a rank.
    pub fn rank(responses: &[Response], policy: TiePolicy) -> Vec<LeaderboardEntry> {
        let mut finished: Vec<&Response> =
            responses.iter().filter(|r| r.status.is_final()).collect();
        finished.sort_by(|a, b| Self::compare(a, b));

        let scores: Vec<i64> = finished.iter().map(|r| r.total_score).collect();
        let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(finished.len());

        for (idx, response) in finished.iter().enumerate() {
            let rank = match (policy, entries.last()) {
                (TiePolicy::Shared, Some(prev))
                    if prev.total_score == response.total_score
                        && prev.total_time_taken == response.total_time_taken
                        && prev.completed_at == response.completed_at =>
                {
                    prev.rank
                }
                (TiePolicy::Shared, Some(prev)) => prev.rank + 1,
                _ => idx as i32 + 1,
            };

            entries.push(LeaderboardEntry {
                rank,
                user_id: response.user_id,
                total_score: response.total_score,
                total_time_taken: response.total_time_taken,
                status: response.status,
                percentage: response.percentage,
                percentile: Self::percentile(response.total_score, &scores),
                completed_at: response.completed_at,
            });
        }

        entries
    }

    /// Share of other participants with a strictly lower score, as a percentage.
    /// A lone participant sits at 100.
    pub fn percentile(score: i64, all_scores: &[i64]) -> f64 {
        if all_scores.len() <= 1 {
            return 100.0;
        }
        let lower = all_scores.iter().filter(|s| **s < score).count();
        round1(lower as f64 / (all_scores.len() - 1) as f64 * 100.0)
    }

    fn compare(a: &Response, b: &Response) -> Ordering {
        b.total_score
            .cmp(&a.total_score)
            .then(a.total_time_taken.cmp(&b.total_time_taken))
            .then(a.completed_at.cmp(&b.completed_at))
            .then(a.completion_seq.cmp(&b.completion_seq))
            .then(a.user_id.cmp(&b.user_id))
    }
}
