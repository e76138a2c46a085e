use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Rating, RatingWithAuthor};

pub(crate) const RATING_COLUMNS: &str = r#"
    rating_id, resort_id, user_id,
    terrain, snow, lifts, apres, family, value, scenery,
    overall, created_at
"#;

pub struct RatingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RatingRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_in(tx: &mut Transaction<'_, Postgres>) -> Result<Vec<Rating>> {
        let sql = format!(
            "SELECT {} FROM ratings ORDER BY resort_id, created_at, rating_id",
            RATING_COLUMNS
        );
        let ratings = sqlx::query_as::<_, Rating>(&sql)
            .fetch_all(&mut **tx)
            .await?;

        Ok(ratings)
    }

    /// Ratings of one resort with their author names, newest first
    pub async fn list_for_resort(&self, resort_id: Uuid) -> Result<Vec<RatingWithAuthor>> {
        let ratings = sqlx::query_as::<_, RatingWithAuthor>(
            r#"
            SELECT
                r.rating_id, r.resort_id, r.user_id,
                r.terrain, r.snow, r.lifts, r.apres, r.family, r.value, r.scenery,
                r.overall, r.created_at,
                u.name AS author_name
            FROM ratings r
            INNER JOIN users u ON r.user_id = u.user_id
            WHERE r.resort_id = $1
            ORDER BY r.created_at DESC, r.rating_id
            "#,
        )
        .bind(resort_id)
        .fetch_all(self.pool)
        .await?;

        Ok(ratings)
    }

    pub async fn insert(tx: &mut Transaction<'_, Postgres>, rating: &Rating) -> Result<Rating> {
        let sql = format!(
            r#"
            INSERT INTO ratings (
                rating_id, resort_id, user_id,
                terrain, snow, lifts, apres, family, value, scenery,
                overall, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            RATING_COLUMNS
        );

        sqlx::query_as::<_, Rating>(&sql)
            .bind(rating.rating_id)
            .bind(rating.resort_id)
            .bind(rating.user_id)
            .bind(rating.scores.terrain)
            .bind(rating.scores.snow)
            .bind(rating.scores.lifts)
            .bind(rating.scores.apres)
            .bind(rating.scores.family)
            .bind(rating.scores.value)
            .bind(rating.scores.scenery)
            .bind(rating.overall)
            .bind(rating.created_at)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| StorageError::from(e).on_foreign_key_violation("Unknown user"))
    }
}
