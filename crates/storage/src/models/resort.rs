use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Rating;

/// A ski resort.
///
/// `average_overall_rating` and `review_count` are a cache of the resort's
/// ratings, refreshed in the same transaction that stores a new rating. The
/// ranking engine never reads them; it works from the ratings themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Resort {
    pub resort_id: Uuid,
    pub name: String,
    pub url: Option<String>,
    pub country: String,
    pub continent: Option<String>,
    pub region: Option<String>,
    pub elevation_top_m: Option<i32>,
    pub elevation_difference_m: Option<i32>,
    pub total_slope_length_km: Option<f64>,
    pub number_of_lifts: Option<i32>,
    pub number_of_slopes: Option<i32>,
    pub annual_snowfall_cm: Option<i32>,
    pub average_overall_rating: Option<f64>,
    pub review_count: i32,
    pub created_at: chrono::NaiveDateTime,
}

/// A resort together with every rating that references it.
///
/// This is the snapshot unit consumed by the ranking engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResortWithRatings {
    pub resort: Resort,
    pub ratings: Vec<Rating>,
}

impl ResortWithRatings {
    pub fn new(resort: Resort, ratings: Vec<Rating>) -> Self {
        Self { resort, ratings }
    }
}

/// A `(continent, country)` pair used to build location facets.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Location {
    pub continent: Option<String>,
    pub country: String,
}
