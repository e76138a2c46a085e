use async_trait::async_trait;
use uuid::Uuid;

use super::ResortStore;
use crate::Database;
use crate::dto::resort::{CountryCount, CreateResortRequest, ResortFilter};
use crate::dto::user::CreateUserRequest;
use crate::error::Result;
use crate::models::{CategoryScores, Location, Rating, RatingWithAuthor, Resort, ResortWithRatings, User};
use crate::repository::{RankingRepository, RatingRepository, ResortRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct PgResortStore {
    db: Database,
}

impl PgResortStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResortStore for PgResortStore {
    async fn snapshot(&self) -> Result<Vec<ResortWithRatings>> {
        RankingRepository::new(self.db.pool()).snapshot().await
    }

    async fn find_resort(&self, resort_id: Uuid) -> Result<Resort> {
        ResortRepository::new(self.db.pool()).find_by_id(resort_id).await
    }

    async fn resort_ratings(&self, resort_id: Uuid) -> Result<Vec<RatingWithAuthor>> {
        RatingRepository::new(self.db.pool())
            .list_for_resort(resort_id)
            .await
    }

    async fn search_resorts(&self, filter: &ResortFilter) -> Result<(Vec<Resort>, i64)> {
        ResortRepository::new(self.db.pool()).search(filter).await
    }

    async fn locations(&self) -> Result<Vec<Location>> {
        ResortRepository::new(self.db.pool()).locations().await
    }

    async fn country_counts(&self) -> Result<Vec<CountryCount>> {
        ResortRepository::new(self.db.pool()).country_counts().await
    }

    async fn create_resort(&self, request: &CreateResortRequest) -> Result<Resort> {
        ResortRepository::new(self.db.pool()).create(request).await
    }

    async fn create_user(&self, request: &CreateUserRequest) -> Result<User> {
        UserRepository::new(self.db.pool()).create(request).await
    }

    async fn submit_rating(
        &self,
        resort_id: Uuid,
        user_id: Uuid,
        scores: CategoryScores,
    ) -> Result<(Rating, Resort)> {
        let mut tx = self.db.pool().begin().await?;

        ResortRepository::lock(&mut tx, resort_id).await?;
        let rating = RatingRepository::insert(&mut tx, &Rating::new(resort_id, user_id, scores)).await?;
        let resort = ResortRepository::refresh_aggregates(&mut tx, resort_id).await?;

        tx.commit().await?;

        tracing::info!(
            resort_id = %resort_id,
            rating_id = %rating.rating_id,
            review_count = resort.review_count,
            "Stored rating"
        );

        Ok((rating, resort))
    }

    async fn recompute_aggregates(&self) -> Result<u64> {
        let updated = ResortRepository::new(self.db.pool())
            .refresh_all_aggregates()
            .await?;

        tracing::info!(resorts = updated, "Recomputed resort aggregates");

        Ok(updated)
    }
}
