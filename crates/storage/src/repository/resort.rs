use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::dto::resort::{CountryCount, CreateResortRequest, ResortFilter, ResortSort};
use crate::error::{Result, StorageError};
use crate::models::{Location, Resort};

pub(crate) const RESORT_COLUMNS: &str = r#"
    resort_id, name, url, country, continent, region,
    elevation_top_m, elevation_difference_m, total_slope_length_km,
    number_of_lifts, number_of_slopes, annual_snowfall_cm,
    average_overall_rating, review_count, created_at
"#;

pub struct ResortRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ResortRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every resort, by name
    pub async fn list_in(tx: &mut Transaction<'_, Postgres>) -> Result<Vec<Resort>> {
        let sql = format!(
            "SELECT {} FROM resorts ORDER BY name, resort_id",
            RESORT_COLUMNS
        );
        let resorts = sqlx::query_as::<_, Resort>(&sql)
            .fetch_all(&mut **tx)
            .await?;

        Ok(resorts)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Resort> {
        let sql = format!("SELECT {} FROM resorts WHERE resort_id = $1", RESORT_COLUMNS);
        sqlx::query_as::<_, Resort>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Catalog search: one page of matching resorts plus the total match count
    pub async fn search(&self, filter: &ResortFilter) -> Result<(Vec<Resort>, i64)> {
        let total_items = self.count_matching(filter).await?;

        let pagination = filter.pagination();
        let mut query = QueryBuilder::new(format!("SELECT {} FROM resorts WHERE 1=1", RESORT_COLUMNS));
        push_filters(&mut query, filter);
        query.push(order_clause(filter.sort));
        query.push(" LIMIT ");
        query.push_bind(pagination.limit() as i64);
        query.push(" OFFSET ");
        query.push_bind(pagination.offset() as i64);

        let resorts = query.build_query_as::<Resort>().fetch_all(self.pool).await?;

        Ok((resorts, total_items))
    }

    async fn count_matching(&self, filter: &ResortFilter) -> Result<i64> {
        let mut query = QueryBuilder::new("SELECT COUNT(*) FROM resorts WHERE 1=1");
        push_filters(&mut query, filter);

        let count = query
            .build_query_scalar::<i64>()
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    pub async fn locations(&self) -> Result<Vec<Location>> {
        let locations = sqlx::query_as::<_, Location>(
            "SELECT DISTINCT continent, country FROM resorts ORDER BY country",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(locations)
    }

    pub async fn country_counts(&self) -> Result<Vec<CountryCount>> {
        let counts = sqlx::query_as::<_, CountryCount>(
            r#"
            SELECT country, COUNT(*) AS resort_count
            FROM resorts
            GROUP BY country
            ORDER BY country
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn create(&self, req: &CreateResortRequest) -> Result<Resort> {
        let sql = format!(
            r#"
            INSERT INTO resorts (
                resort_id, name, url, country, continent, region,
                elevation_top_m, elevation_difference_m, total_slope_length_km,
                number_of_lifts, number_of_slopes, annual_snowfall_cm
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            RESORT_COLUMNS
        );

        sqlx::query_as::<_, Resort>(&sql)
            .bind(Uuid::new_v4())
            .bind(&req.name)
            .bind(&req.url)
            .bind(&req.country)
            .bind(&req.continent)
            .bind(&req.region)
            .bind(req.elevation_top_m)
            .bind(req.elevation_difference_m)
            .bind(req.total_slope_length_km)
            .bind(req.number_of_lifts)
            .bind(req.number_of_slopes)
            .bind(req.annual_snowfall_cm)
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                StorageError::from(e)
                    .on_unique_violation("A resort with this name already exists in this country")
            })
    }

    /// Lock a resort row for the rest of the transaction
    pub async fn lock(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<()> {
        sqlx::query_scalar::<_, Uuid>("SELECT resort_id FROM resorts WHERE resort_id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(())
    }

    /// Rebuild one resort's cached aggregates from its ratings
    pub async fn refresh_aggregates(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<Resort> {
        let sql = format!(
            "UPDATE resorts SET {} WHERE resort_id = $1 RETURNING {}",
            AGGREGATE_ASSIGNMENTS, RESORT_COLUMNS
        );

        sqlx::query_as::<_, Resort>(&sql)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Rebuild the cached aggregates of every resort
    pub async fn refresh_all_aggregates(&self) -> Result<u64> {
        let sql = format!("UPDATE resorts SET {}", AGGREGATE_ASSIGNMENTS);
        let result = sqlx::query(&sql).execute(self.pool).await?;

        Ok(result.rows_affected())
    }
}

const AGGREGATE_ASSIGNMENTS: &str = r#"
    review_count = (
        SELECT COUNT(*)::INTEGER FROM ratings WHERE ratings.resort_id = resorts.resort_id
    ),
    average_overall_rating = (
        SELECT AVG(overall) FROM ratings WHERE ratings.resort_id = resorts.resort_id
    )
"#;

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &ResortFilter) {
    if let Some(q) = filter.query() {
        query.push(" AND name ILIKE ");
        query.push_bind(format!("%{}%", escape_like(q)));
    }

    if let Some(continent) = filter.continent() {
        query.push(" AND LOWER(continent) = LOWER(");
        query.push_bind(continent.to_string());
        query.push(")");
    }

    if let Some(country) = filter.country() {
        query.push(" AND LOWER(country) = LOWER(");
        query.push_bind(country.to_string());
        query.push(")");
    }

    if let Some(min) = filter.min_rating() {
        query.push(" AND average_overall_rating >= ");
        query.push_bind(min);
    }
}

fn order_clause(sort: ResortSort) -> &'static str {
    match sort {
        ResortSort::RatingDesc => {
            " ORDER BY average_overall_rating DESC NULLS LAST, name ASC, resort_id ASC"
        }
        ResortSort::RatingAsc => {
            " ORDER BY average_overall_rating ASC NULLS LAST, name ASC, resort_id ASC"
        }
        ResortSort::NameAsc => " ORDER BY name ASC, resort_id ASC",
        ResortSort::NameDesc => " ORDER BY name DESC, resort_id ASC",
        ResortSort::ReviewsDesc => " ORDER BY review_count DESC, name ASC, resort_id ASC",
    }
}

fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
