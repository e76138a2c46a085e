use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::{PaginationMeta, PaginationParams, default_page, default_page_size};
use crate::models::{Location, RatingWithAuthor, Resort};
use crate::services::resort_summary::CategoryAverage;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResortSort {
    #[default]
    RatingDesc,
    RatingAsc,
    NameAsc,
    NameDesc,
    ReviewsDesc,
}

/// Catalog search parameters.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ResortFilter {
    /// Case-insensitive substring of the resort name
    pub q: Option<String>,
    pub continent: Option<String>,
    pub country: Option<String>,
    /// Minimum cached average rating; ignored when not positive
    pub min: Option<f64>,
    #[serde(default)]
    pub sort: ResortSort,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for ResortFilter {
    fn default() -> Self {
        Self {
            q: None,
            continent: None,
            country: None,
            min: None,
            sort: ResortSort::default(),
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl ResortFilter {
    pub fn validate(&self, page_cap: usize) -> Result<(), String> {
        self.pagination().validate(page_cap)?;

        if let Some(min) = self.min
            && !min.is_finite()
        {
            return Err("min must be a finite number".to_string());
        }

        Ok(())
    }

    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }

    /// Trimmed name query, `None` when blank.
    pub fn query(&self) -> Option<&str> {
        non_blank(self.q.as_deref())
    }

    pub fn continent(&self) -> Option<&str> {
        non_blank(self.continent.as_deref())
    }

    pub fn country(&self) -> Option<&str> {
        non_blank(self.country.as_deref())
    }

    pub fn min_rating(&self) -> Option<f64> {
        self.min.filter(|min| *min > 0.0)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Request payload for creating a resort
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateResortRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(url)]
    #[validate(length(max = 500))]
    pub url: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Country is required"))]
    pub country: String,

    #[validate(length(max = 255))]
    pub continent: Option<String>,

    #[validate(length(max = 255))]
    pub region: Option<String>,

    #[validate(range(min = 0, max = 9000))]
    pub elevation_top_m: Option<i32>,

    #[validate(range(min = 0, max = 9000))]
    pub elevation_difference_m: Option<i32>,

    #[validate(range(min = 0.0))]
    pub total_slope_length_km: Option<f64>,

    #[validate(range(min = 0))]
    pub number_of_lifts: Option<i32>,

    #[validate(range(min = 0))]
    pub number_of_slopes: Option<i32>,

    #[validate(range(min = 0))]
    pub annual_snowfall_cm: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResortResponse {
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
    pub created_at: NaiveDateTime,
}

impl From<Resort> for ResortResponse {
    fn from(resort: Resort) -> Self {
        Self {
            resort_id: resort.resort_id,
            name: resort.name,
            url: resort.url,
            country: resort.country,
            continent: resort.continent,
            region: resort.region,
            elevation_top_m: resort.elevation_top_m,
            elevation_difference_m: resort.elevation_difference_m,
            total_slope_length_km: resort.total_slope_length_km,
            number_of_lifts: resort.number_of_lifts,
            number_of_slopes: resort.number_of_slopes,
            annual_snowfall_cm: resort.annual_snowfall_cm,
            average_overall_rating: resort.average_overall_rating,
            review_count: resort.review_count,
            created_at: resort.created_at,
        }
    }
}

/// Values offered by the catalog's location filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LocationFacets {
    pub continents: Vec<String>,
    /// Countries of the selected continent, or of every resort when none is selected
    pub countries: Vec<String>,
}

impl LocationFacets {
    pub fn from_locations(locations: &[Location], continent: Option<&str>) -> Self {
        let continents: BTreeSet<String> = locations
            .iter()
            .filter_map(|l| l.continent.as_deref())
            .filter(|c| !c.is_empty())
            .map(String::from)
            .collect();

        let continent = continent.map(str::to_lowercase);
        let countries: BTreeSet<String> = locations
            .iter()
            .filter(|l| match &continent {
                Some(continent) => l
                    .continent
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase() == *continent),
                None => true,
            })
            .map(|l| l.country.clone())
            .filter(|c| !c.is_empty())
            .collect();

        Self {
            continents: continents.into_iter().collect(),
            countries: countries.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResortCatalogResponse {
    pub data: Vec<ResortResponse>,
    pub pagination: PaginationMeta,
    pub facets: LocationFacets,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct CountryCount {
    pub country: String,
    pub resort_count: i64,
}

/// Resort page: the resort, its ratings and per-category breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResortDetailResponse {
    pub resort: ResortResponse,
    pub ratings: Vec<RatingWithAuthor>,
    pub category_averages: Vec<CategoryAverage>,
    pub top_category: Option<CategoryAverage>,
}
