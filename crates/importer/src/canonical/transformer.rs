use super::models::{CanonicalFormat, ResortData};
use crate::Result;
use sqlx::PgPool;
use tracing::{debug, info};

/// Counts of resorts written by one import.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub updated: usize,
}

pub struct CanonicalTransformer<'a> {
    pool: &'a PgPool,
}

impl<'a> CanonicalTransformer<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Upsert every resort by `(name, country)` in a single transaction.
    ///
    /// Cached rating aggregates are left untouched; an updated resort keeps its ratings.
    pub async fn import_to_database(&self, canonical: CanonicalFormat) -> Result<ImportSummary> {
        let mut tx = self.pool.begin().await?;
        let mut summary = ImportSummary::default();

        for resort in &canonical.resorts {
            if self.upsert_resort(resort, &mut tx).await? {
                summary.inserted += 1;
            } else {
                summary.updated += 1;
            }
        }

        tx.commit().await?;

        info!(
            inserted = summary.inserted,
            updated = summary.updated,
            "Imported resorts"
        );

        Ok(summary)
    }

    /// Returns `true` when the resort was newly inserted.
    async fn upsert_resort(
        &self,
        resort: &ResortData,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<bool> {
        let inserted = sqlx::query_scalar::<_, bool>(
            r#"
            INSERT INTO resorts (
                name, url, country, continent, region,
                elevation_top_m, elevation_difference_m, total_slope_length_km,
                number_of_lifts, number_of_slopes, annual_snowfall_cm
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (name, country)
            DO UPDATE SET
                url = EXCLUDED.url,
                continent = EXCLUDED.continent,
                region = EXCLUDED.region,
                elevation_top_m = EXCLUDED.elevation_top_m,
                elevation_difference_m = EXCLUDED.elevation_difference_m,
                total_slope_length_km = EXCLUDED.total_slope_length_km,
                number_of_lifts = EXCLUDED.number_of_lifts,
                number_of_slopes = EXCLUDED.number_of_slopes,
                annual_snowfall_cm = EXCLUDED.annual_snowfall_cm
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(resort.name.trim())
        .bind(&resort.url)
        .bind(resort.country.trim())
        .bind(&resort.continent)
        .bind(&resort.region)
        .bind(resort.elevation_top_m)
        .bind(resort.elevation_difference_m)
        .bind(resort.total_slope_length_km)
        .bind(resort.number_of_lifts)
        .bind(resort.number_of_slopes)
        .bind(resort.annual_snowfall_cm)
        .fetch_one(&mut **tx)
        .await?;

        debug!(resort = %resort.label(), inserted, "Upserted resort");

        Ok(inserted)
    }
}
