use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Metric, Rating};

use super::aggregate;

/// Raw (unshrunk) average of one category for a single resort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryAverage {
    pub metric: Metric,
    pub label: String,
    pub average: f64,
}

/// Per-category averages in display order; 0.0 for every category when unrated.
pub fn category_averages(ratings: &[Rating]) -> Vec<CategoryAverage> {
    Metric::CATEGORIES
        .iter()
        .map(|&metric| CategoryAverage {
            metric,
            label: metric.label().to_string(),
            average: aggregate(ratings, metric).mean,
        })
        .collect()
}

/// Best category of a rated resort. Ties go to the category listed first.
pub fn top_category(averages: &[CategoryAverage], review_count: usize) -> Option<&CategoryAverage> {
    if review_count == 0 {
        return None;
    }

    averages
        .iter()
        .fold(None, |best: Option<&CategoryAverage>, candidate| match best {
            Some(current) if current.average >= candidate.average => Some(current),
            _ => Some(candidate),
        })
}
