use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{MAX_SCORE, Metric, Resort, ResortWithRatings};

use super::{ShrinkageRanker, aggregate};

/// Display bucket derived from a final rank position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Gold,
    Silver,
    Bronze,
    Rest,
}

impl Bucket {
    /// Bucket for a zero-based position.
    pub fn for_position(position: usize) -> Self {
        match position {
            0 => Self::Gold,
            1 => Self::Silver,
            2 => Self::Bronze,
            _ => Self::Rest,
        }
    }

    pub fn medal(&self) -> Option<&'static str> {
        match self {
            Self::Gold => Some("🥇"),
            Self::Silver => Some("🥈"),
            Self::Bronze => Some("🥉"),
            Self::Rest => None,
        }
    }
}

/// One ranked resort for one metric. Lives only as long as the snapshot it borrows.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingEntry<'a> {
    /// 1-based rank.
    pub rank: usize,
    pub resort: &'a Resort,
    pub metric: Metric,
    pub mean: f64,
    pub count: usize,
    pub score: f64,
    pub bucket: Bucket,
}

impl RankingEntry<'_> {
    /// Score as a percentage of the rating scale, for score bars.
    pub fn bar_percent(&self) -> f64 {
        (self.score / MAX_SCORE * 100.0).clamp(0.0, 100.0)
    }
}

/// Builds ordered Top-N leaderboards for a single metric.
#[derive(Debug, Clone, Copy)]
pub struct LeaderboardBuilder {
    ranker: ShrinkageRanker,
}

impl LeaderboardBuilder {
    pub fn new(ranker: ShrinkageRanker) -> Self {
        Self { ranker }
    }

    pub fn ranker(&self) -> ShrinkageRanker {
        self.ranker
    }

    /// Rank every resort by the shrunk score of `metric` and keep the first `limit`.
    ///
    /// Ordering is score descending, then rating count descending, then resort
    /// id ascending, so the output does not depend on the input order. Resorts
    /// without ratings take part with `score == global_average`.
    pub fn build<'a>(
        &self,
        resorts: &'a [ResortWithRatings],
        metric: Metric,
        global_average: f64,
        limit: usize,
    ) -> Vec<RankingEntry<'a>> {
        self.build_from(resorts.iter(), metric, global_average, limit)
    }

    /// Same as [`build`](Self::build) over any borrowed subset of a snapshot.
    pub fn build_from<'a, I>(
        &self,
        resorts: I,
        metric: Metric,
        global_average: f64,
        limit: usize,
    ) -> Vec<RankingEntry<'a>>
    where
        I: IntoIterator<Item = &'a ResortWithRatings>,
    {
        let mut scored: Vec<(&'a Resort, f64, usize, f64)> = resorts
            .into_iter()
            .map(|entry| {
                let agg = aggregate(&entry.ratings, metric);
                let score = self.ranker.score(agg, global_average);
                (&entry.resort, agg.mean, agg.count, score)
            })
            .collect();

        scored.sort_by(|a, b| compare(a.3, a.2, a.0, b.3, b.2, b.0));

        tracing::debug!(
            metric = %metric,
            candidates = scored.len(),
            limit,
            global_average,
            "built leaderboard"
        );

        scored
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(position, (resort, mean, count, score))| RankingEntry {
                rank: position + 1,
                resort,
                metric,
                mean,
                count,
                score,
                bucket: Bucket::for_position(position),
            })
            .collect()
    }
}

fn compare(
    score_a: f64,
    count_a: usize,
    resort_a: &Resort,
    score_b: f64,
    count_b: usize,
    resort_b: &Resort,
) -> Ordering {
    score_b
        .total_cmp(&score_a)
        .then_with(|| count_b.cmp(&count_a))
        .then_with(|| resort_a.resort_id.cmp(&resort_b.resort_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{resort_with_overall, resort_with_scores};
    use uuid::Uuid;

    fn builder() -> LeaderboardBuilder {
        LeaderboardBuilder::new(ShrinkageRanker::new(5).unwrap())
    }

    #[test]
    fn test_bucket_assignment_by_position() {
        assert_eq!(Bucket::for_position(0), Bucket::Gold);
        assert_eq!(Bucket::for_position(1), Bucket::Silver);
        assert_eq!(Bucket::for_position(2), Bucket::Bronze);
        for position in 3..20 {
            assert_eq!(Bucket::for_position(position), Bucket::Rest);
        }
        assert_eq!(Bucket::Gold.medal(), Some("🥇"));
        assert_eq!(Bucket::Rest.medal(), None);
    }

    #[test]
    fn test_empty_snapshot_yields_empty_leaderboard() {
        assert!(builder().build(&[], Metric::Overall, 7.0, 10).is_empty());
    }

    #[test]
    fn test_shrinkage_demotes_small_samples() {
        let a = resort_with_overall("A", &[9.0; 50]);
        let b = resort_with_overall("B", &[10.0]);
        let c = resort_with_overall("C", &[]);
        let snapshot = vec![c, b, a];

        let board = builder().build(&snapshot, Metric::Overall, 7.0, 10);
        let names: Vec<&str> = board.iter().map(|e| e.resort.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);

        assert!((board[0].score - (50.0 / 55.0 * 9.0 + 5.0 / 55.0 * 7.0)).abs() < 1e-9);
        assert!((board[1].score - 7.5).abs() < 1e-9);
        assert_eq!(board[2].score, 7.0);
        assert_eq!(board[2].count, 0);
        assert_eq!(board[2].mean, 0.0);

        let buckets: Vec<Bucket> = board.iter().map(|e| e.bucket).collect();
        assert_eq!(buckets, vec![Bucket::Gold, Bucket::Silver, Bucket::Bronze]);
        let ranks: Vec<usize> = board.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_unrated_resort_can_reach_top_n() {
        let weak = resort_with_overall("Weak", &[2.0; 20]);
        let unrated = resort_with_overall("Unrated", &[]);
        let snapshot = vec![weak, unrated];

        let board = builder().build(&snapshot, Metric::Overall, 8.0, 1);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].resort.name, "Unrated");
        assert_eq!(board[0].score, 8.0);
    }

    #[test]
    fn test_limit_truncates_output() {
        let snapshot: Vec<_> = (0..15)
            .map(|i| resort_with_overall(&format!("R{}", i), &[5.0 + i as f64 * 0.25]))
            .collect();

        assert_eq!(builder().build(&snapshot, Metric::Overall, 6.0, 10).len(), 10);
        assert_eq!(builder().build(&snapshot, Metric::Overall, 6.0, 72).len(), 15);
        assert!(builder().build(&snapshot, Metric::Overall, 6.0, 0).is_empty());
    }

    #[test]
    fn test_output_is_sorted_non_increasing() {
        let snapshot: Vec<_> = [3.0, 9.5, 6.0, 7.5, 1.0, 8.0]
            .iter()
            .enumerate()
            .map(|(i, &v)| resort_with_overall(&format!("R{}", i), &vec![v; i + 1]))
            .collect();

        let board = builder().build(&snapshot, Metric::Overall, 6.0, 10);
        assert!(board.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_ties_break_on_count_then_id() {
        // Every resort scores exactly the global average of 7.0.
        let mut snapshot = vec![
            resort_with_overall("three-ratings", &[7.0; 3]),
            resort_with_overall("unrated-1", &[]),
            resort_with_overall("eleven-ratings", &[7.0; 11]),
            resort_with_overall("unrated-2", &[]),
        ];
        snapshot[1].resort.resort_id = Uuid::from_u128(2);
        snapshot[3].resort.resort_id = Uuid::from_u128(1);

        let board = builder().build(&snapshot, Metric::Overall, 7.0, 10);
        assert!(board.iter().all(|e| e.score == 7.0));

        let names: Vec<&str> = board.iter().map(|e| e.resort.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["eleven-ratings", "three-ratings", "unrated-2", "unrated-1"]
        );
    }

    #[test]
    fn test_order_is_independent_of_input_order() {
        let snapshot = vec![
            resort_with_overall("A", &[7.0]),
            resort_with_overall("B", &[7.0]),
            resort_with_overall("C", &[]),
            resort_with_overall("D", &[8.0, 6.0]),
        ];
        let mut reversed = snapshot.clone();
        reversed.reverse();

        let ids = |board: Vec<RankingEntry<'_>>| -> Vec<Uuid> {
            board.iter().map(|e| e.resort.resort_id).collect()
        };

        let first = ids(builder().build(&snapshot, Metric::Overall, 7.0, 10));
        let second = ids(builder().build(&snapshot, Metric::Overall, 7.0, 10));
        let third = ids(builder().build(&reversed, Metric::Overall, 7.0, 10));
        assert_eq!(first, second);
        assert_eq!(first, third);
    }

    #[test]
    fn test_categories_rank_independently() {
        let base = resort_with_scores("A", &[(8.0, 4.0); 3]);
        let mut changed = base.clone();
        for rating in &mut changed.ratings {
            rating.scores.snow = 10.0;
        }

        let before = builder().build(std::slice::from_ref(&base), Metric::Terrain, 6.0, 10);
        let after = builder().build(std::slice::from_ref(&changed), Metric::Terrain, 6.0, 10);
        assert_eq!(before[0].score, after[0].score);

        let snow_before = builder().build(std::slice::from_ref(&base), Metric::Snow, 6.0, 10);
        let snow_after = builder().build(std::slice::from_ref(&changed), Metric::Snow, 6.0, 10);
        assert!(snow_after[0].score > snow_before[0].score);
    }

    #[test]
    fn test_bar_percent_is_clamped() {
        let snapshot = vec![resort_with_overall("A", &[9.0; 100])];
        let board = builder().build(&snapshot, Metric::Overall, 7.0, 10);
        assert!((board[0].bar_percent() - board[0].score * 10.0).abs() < 1e-9);

        let mut entry = board[0].clone();
        entry.score = 12.0;
        assert_eq!(entry.bar_percent(), 100.0);
        entry.score = -1.0;
        assert_eq!(entry.bar_percent(), 0.0);
    }
}
