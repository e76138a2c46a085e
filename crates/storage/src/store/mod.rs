//! The data-access seam between the HTTP layer and persistence.
//!
//! Handlers only ever see `Arc<dyn ResortStore>`. Production wires in
//! [`PgResortStore`]; tests use the in-memory implementation.

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::dto::resort::{CountryCount, CreateResortRequest, ResortFilter};
use crate::dto::user::CreateUserRequest;
use crate::error::Result;
use crate::models::{CategoryScores, Location, Rating, RatingWithAuthor, Resort, ResortWithRatings, User};

pub use postgres::PgResortStore;

#[async_trait]
pub trait ResortStore: Send + Sync {
    /// Every resort with all of its ratings, for the ranking engine.
    async fn snapshot(&self) -> Result<Vec<ResortWithRatings>>;

    async fn find_resort(&self, resort_id: Uuid) -> Result<Resort>;

    /// Ratings of one resort, newest first.
    async fn resort_ratings(&self, resort_id: Uuid) -> Result<Vec<RatingWithAuthor>>;

    /// One catalog page and the total number of matches.
    async fn search_resorts(&self, filter: &ResortFilter) -> Result<(Vec<Resort>, i64)>;

    async fn locations(&self) -> Result<Vec<Location>>;

    async fn country_counts(&self) -> Result<Vec<CountryCount>>;

    async fn create_resort(&self, request: &CreateResortRequest) -> Result<Resort>;

    async fn create_user(&self, request: &CreateUserRequest) -> Result<User>;

    /// Store a rating and refresh the resort's cached aggregates atomically.
    ///
    /// Returns the stored rating and the resort with its new aggregates.
    async fn submit_rating(
        &self,
        resort_id: Uuid,
        user_id: Uuid,
        scores: CategoryScores,
    ) -> Result<(Rating, Resort)>;

    /// Rebuild every resort's cached aggregates. Returns the number of resorts touched.
    async fn recompute_aggregates(&self) -> Result<u64>;
}
