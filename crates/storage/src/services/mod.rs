//! The ranking engine.
//!
//! Everything here is a pure function of a [`ResortWithRatings`] snapshot:
//! nothing is cached between calls and nothing touches the database.
//!
//! [`ResortWithRatings`]: crate::models::ResortWithRatings

pub mod aggregation;
pub mod leaderboard;
pub mod rankings;
pub mod resort_summary;
pub mod shrinkage;
pub mod statistics;

pub use aggregation::{Aggregate, aggregate};
pub use leaderboard::{Bucket, LeaderboardBuilder, RankingEntry};
pub use rankings::RankingSettings;
pub use shrinkage::{ShrinkageRanker, shrunk_score};
pub use statistics::GlobalStatistics;

use thiserror::Error;

pub const DEFAULT_MIN_VOTES: u32 = 5;
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
pub const DEFAULT_LISTING_PAGE_CAP: usize = 72;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankingError {
    #[error("min_votes must be greater than zero, got {0}")]
    InvalidMinVotes(u32),

    #[error("leaderboard limit must be between 1 and the listing page cap ({cap}), got {limit}")]
    InvalidLimit { limit: usize, cap: usize },
}

#[cfg(test)]
pub(crate) mod fixtures {
    use uuid::Uuid;

    use crate::models::{CategoryScores, Rating, Resort, ResortWithRatings};

    pub fn resort(name: &str, country: &str) -> Resort {
        Resort {
            resort_id: Uuid::new_v4(),
            name: name.to_string(),
            url: None,
            country: country.to_string(),
            continent: Some("Europe".to_string()),
            region: None,
            elevation_top_m: None,
            elevation_difference_m: None,
            total_slope_length_km: None,
            number_of_lifts: None,
            number_of_slopes: None,
            annual_snowfall_cm: None,
            average_overall_rating: None,
            review_count: 0,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    pub fn uniform(value: f64) -> CategoryScores {
        CategoryScores {
            terrain: value,
            snow: value,
            lifts: value,
            apres: value,
            family: value,
            value,
            scenery: value,
        }
    }

    /// A resort whose every rating scores `value` in all seven categories.
    pub fn resort_with_overall(name: &str, values: &[f64]) -> ResortWithRatings {
        let resort = resort(name, "France");
        let ratings = values
            .iter()
            .map(|&v| Rating::new(resort.resort_id, Uuid::new_v4(), uniform(v)))
            .collect();
        ResortWithRatings::new(resort, ratings)
    }

    /// A resort with explicit `(terrain, snow)` pairs; other categories score 5.0.
    pub fn resort_with_scores(name: &str, pairs: &[(f64, f64)]) -> ResortWithRatings {
        let resort = resort(name, "France");
        let ratings = pairs
            .iter()
            .map(|&(terrain, snow)| {
                Rating::new(
                    resort.resort_id,
                    Uuid::new_v4(),
                    CategoryScores {
                        terrain,
                        snow,
                        ..uniform(5.0)
                    },
                )
            })
            .collect();
        ResortWithRatings::new(resort, ratings)
    }
}
