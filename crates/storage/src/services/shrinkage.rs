use std::num::NonZeroU32;

use super::{Aggregate, DEFAULT_MIN_VOTES, RankingError};

const DEFAULT_PRIOR_WEIGHT: NonZeroU32 = match NonZeroU32::new(DEFAULT_MIN_VOTES) {
    Some(weight) => weight,
    None => panic!("DEFAULT_MIN_VOTES must be non-zero"),
};

/// Blend a sample mean with the global prior, weighted by sample size.
///
/// `score = n/(n+m) * mean + m/(n+m) * global_average`. With `n == 0` the
/// result is exactly `global_average` for any finite mean.
pub fn shrunk_score(mean: f64, count: usize, global_average: f64, min_votes: NonZeroU32) -> f64 {
    let n = count as f64;
    let m = f64::from(min_votes.get());
    let total = n + m;

    (n / total) * mean + (m / total) * global_average
}

/// Shrinkage ("Bayesian-weighted") ranker with a fixed prior weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShrinkageRanker {
    min_votes: NonZeroU32,
}

impl ShrinkageRanker {
    /// Fails when `min_votes` is zero, which would leave unrated resorts undefined.
    pub fn new(min_votes: u32) -> Result<Self, RankingError> {
        NonZeroU32::new(min_votes)
            .map(|min_votes| Self { min_votes })
            .ok_or(RankingError::InvalidMinVotes(min_votes))
    }

    pub fn min_votes(&self) -> u32 {
        self.min_votes.get()
    }

    pub fn score(&self, aggregate: Aggregate, global_average: f64) -> f64 {
        shrunk_score(aggregate.mean, aggregate.count, global_average, self.min_votes)
    }
}

impl Default for ShrinkageRanker {
    fn default() -> Self {
        Self {
            min_votes: DEFAULT_PRIOR_WEIGHT,
        }
    }
}
