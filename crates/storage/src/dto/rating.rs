use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{CategoryScores, MAX_SCORE, MIN_SCORE, Rating, Resort, SCORE_STEP};

/// Request payload for rating a resort. Every score is in [1, 10] in steps of 0.5.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_score_steps"))]
pub struct SubmitRatingRequest {
    pub user_id: Uuid,

    #[validate(range(min = 1.0, max = 10.0, message = "Terrain must be between 1 and 10"))]
    pub terrain: f64,

    #[validate(range(min = 1.0, max = 10.0, message = "Snow must be between 1 and 10"))]
    pub snow: f64,

    #[validate(range(min = 1.0, max = 10.0, message = "Lifts must be between 1 and 10"))]
    pub lifts: f64,

    #[validate(range(min = 1.0, max = 10.0, message = "Après-ski must be between 1 and 10"))]
    pub apres: f64,

    #[validate(range(min = 1.0, max = 10.0, message = "Family must be between 1 and 10"))]
    pub family: f64,

    #[validate(range(min = 1.0, max = 10.0, message = "Value must be between 1 and 10"))]
    pub value: f64,

    #[validate(range(min = 1.0, max = 10.0, message = "Scenery must be between 1 and 10"))]
    pub scenery: f64,
}

impl SubmitRatingRequest {
    pub fn scores(&self) -> CategoryScores {
        CategoryScores {
            terrain: self.terrain,
            snow: self.snow,
            lifts: self.lifts,
            apres: self.apres,
            family: self.family,
            value: self.value,
            scenery: self.scenery,
        }
    }
}

fn validate_score_steps(request: &SubmitRatingRequest) -> Result<(), ValidationError> {
    let scores = request.scores();
    let on_grid = crate::models::Metric::CATEGORIES.iter().all(|&metric| {
        let value = scores.get(metric);
        let steps = (value - MIN_SCORE) / SCORE_STEP;
        (MIN_SCORE..=MAX_SCORE).contains(&value) && (steps - steps.round()).abs() < 1e-9
    });

    if on_grid {
        Ok(())
    } else {
        let mut error = ValidationError::new("score_step");
        error.message = Some("Scores must be multiples of 0.5".into());
        Err(error)
    }
}

/// Cached aggregates of a resort right after a rating was stored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResortAggregates {
    pub resort_id: Uuid,
    pub average_overall_rating: Option<f64>,
    pub review_count: i32,
}

impl From<&Resort> for ResortAggregates {
    fn from(resort: &Resort) -> Self {
        Self {
            resort_id: resort.resort_id,
            average_overall_rating: resort.average_overall_rating,
            review_count: resort.review_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitRatingResponse {
    pub rating: Rating,
    pub resort: ResortAggregates,
}
