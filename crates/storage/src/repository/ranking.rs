use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use super::{RatingRepository, ResortRepository};
use crate::error::Result;
use crate::models::{Rating, ResortWithRatings};

pub struct RankingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RankingRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every resort paired with all of its ratings.
    ///
    /// Both tables are read inside one repeatable-read transaction so the
    /// snapshot is consistent with concurrent submissions.
    pub async fn snapshot(&self) -> Result<Vec<ResortWithRatings>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let resorts = ResortRepository::list_in(&mut tx).await?;
        let ratings = RatingRepository::list_in(&mut tx).await?;
        tx.commit().await?;

        let mut by_resort: HashMap<Uuid, Vec<Rating>> = HashMap::new();
        for rating in ratings {
            by_resort.entry(rating.resort_id).or_default().push(rating);
        }

        let snapshot = resorts
            .into_iter()
            .map(|resort| {
                let ratings = by_resort.remove(&resort.resort_id).unwrap_or_default();
                ResortWithRatings::new(resort, ratings)
            })
            .collect::<Vec<_>>();

        tracing::debug!(resorts = snapshot.len(), "Loaded ranking snapshot");

        Ok(snapshot)
    }
}
