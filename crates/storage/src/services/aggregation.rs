use crate::models::{Metric, Rating};

/// Mean and sample size of one metric over a resort's ratings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aggregate {
    pub mean: f64,
    pub count: usize,
}

/// Reduce a resort's ratings to the unweighted mean of `metric`.
///
/// An empty collection yields `(0.0, 0)`. The zero mean is harmless downstream:
/// shrinkage multiplies it by `count / (count + min_votes)`, which is zero.
pub fn aggregate(ratings: &[Rating], metric: Metric) -> Aggregate {
    if ratings.is_empty() {
        return Aggregate::default();
    }

    let sum: f64 = ratings.iter().map(|r| r.metric_value(metric)).sum();
    let count = ratings.len();

    Aggregate {
        mean: sum / count as f64,
        count,
    }
}
