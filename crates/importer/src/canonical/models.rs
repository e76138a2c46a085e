use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalFormat {
    pub format_version: String,
    pub source: SourceMetadata,
    pub resorts: Vec<ResortData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    #[serde(rename = "type")]
    pub r#type: SourceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub extracted_at: DateTime<Utc>,
    pub extractor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Csv,
    Html,
    Manual,
}

/// One resort as supplied by a catalog source. Ratings are never imported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResortData {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation_top_m: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation_difference_m: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_slope_length_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_lifts: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_slopes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_snowfall_cm: Option<i32>,
}

impl ResortData {
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.country)
    }
}
