use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Metric;

/// Lowest score a category can be given.
pub const MIN_SCORE: f64 = 1.0;
/// Highest score a category can be given. Also the scale used for score bars.
pub const MAX_SCORE: f64 = 10.0;
/// Granularity of category scores accepted by the submission workflow.
pub const SCORE_STEP: f64 = 0.5;

/// The seven category scores of a single rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CategoryScores {
    pub terrain: f64,
    pub snow: f64,
    pub lifts: f64,
    pub apres: f64,
    pub family: f64,
    pub value: f64,
    pub scenery: f64,
}

impl CategoryScores {
    /// Score for one category. `Metric::Overall` is derived, so it yields the mean.
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Overall => self.overall(),
            Metric::Terrain => self.terrain,
            Metric::Snow => self.snow,
            Metric::Lifts => self.lifts,
            Metric::Apres => self.apres,
            Metric::Family => self.family,
            Metric::Value => self.value,
            Metric::Scenery => self.scenery,
        }
    }

    /// Arithmetic mean of the seven categories.
    pub fn overall(&self) -> f64 {
        let sum: f64 = Metric::CATEGORIES.iter().map(|&m| self.get(m)).sum();
        sum / Metric::CATEGORIES.len() as f64
    }
}

/// A rating submission. Immutable once stored.
///
/// `overall` is fixed at creation time and is never recomputed from the
/// category scores afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Rating {
    pub rating_id: Uuid,
    pub resort_id: Uuid,
    pub user_id: Uuid,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub scores: CategoryScores,
    pub overall: f64,
    pub created_at: NaiveDateTime,
}

impl Rating {
    pub fn new(resort_id: Uuid, user_id: Uuid, scores: CategoryScores) -> Self {
        Self {
            rating_id: Uuid::new_v4(),
            resort_id,
            user_id,
            scores,
            overall: scores.overall(),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Value of `metric` for this rating, reading the stored overall score.
    pub fn metric_value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Overall => self.overall,
            category => self.scores.get(category),
        }
    }
}

/// A rating joined with the display name of its author.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RatingWithAuthor {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub rating: Rating,
    pub author_name: String,
}
