use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::{Metric, Resort};
use crate::services::{Bucket, GlobalStatistics, RankingEntry};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct LeaderboardFilter {
    /// Number of entries to return; defaults to the configured leaderboard size
    pub limit: Option<u32>,
    /// Restrict candidates to one country (case-insensitive)
    pub country: Option<String>,
}

impl LeaderboardFilter {
    pub fn validate(&self, page_cap: usize) -> Result<(), String> {
        if let Some(limit) = self.limit
            && (limit < 1 || limit as usize > page_cap)
        {
            return Err(format!("limit must be between 1 and {}", page_cap));
        }

        if let Some(ref country) = self.country
            && country.trim().is_empty()
        {
            return Err("country must not be empty".to_string());
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResortInfo {
    pub resort_id: Uuid,
    pub name: String,
    pub country: String,
    pub continent: Option<String>,
    pub region: Option<String>,
}

impl From<&Resort> for ResortInfo {
    fn from(resort: &Resort) -> Self {
        Self {
            resort_id: resort.resort_id,
            name: resort.name.clone(),
            country: resort.country.clone(),
            continent: resort.continent.clone(),
            region: resort.region.clone(),
        }
    }
}

/// One row of a leaderboard, in final order. Clients must not re-sort or re-bucket.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub resort: ResortInfo,
    /// Raw mean of the metric; 0.0 when the resort has no ratings
    pub mean: f64,
    pub review_count: u32,
    /// Shrinkage-adjusted ranking score
    pub score: f64,
    pub bucket: Bucket,
    pub medal: Option<String>,
    /// Score as a percentage of the 10-point scale
    pub bar_percent: f64,
}

impl From<&RankingEntry<'_>> for LeaderboardEntry {
    fn from(entry: &RankingEntry<'_>) -> Self {
        Self {
            rank: entry.rank as u32,
            resort: ResortInfo::from(entry.resort),
            mean: entry.mean,
            review_count: entry.count as u32,
            score: entry.score,
            bucket: entry.bucket,
            medal: entry.bucket.medal().map(String::from),
            bar_percent: entry.bar_percent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardResponse {
    pub metric: Metric,
    pub label: String,
    pub min_votes: u32,
    pub global_average: f64,
    pub entries: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RankingStats {
    pub resorts_ranked: u32,
    pub rated_resorts: u32,
    pub total_ratings: u32,
    pub countries: u32,
    pub global_average: f64,
}

impl From<GlobalStatistics> for RankingStats {
    fn from(stats: GlobalStatistics) -> Self {
        Self {
            resorts_ranked: stats.resorts_ranked as u32,
            rated_resorts: stats.rated_resorts as u32,
            total_ratings: stats.total_ratings as u32,
            countries: stats.countries as u32,
            global_average: stats.global_average,
        }
    }
}

/// Everything the rankings page shows: statistics, the overall Top-N and one
/// Top-N per category.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RankingsOverview {
    pub stats: RankingStats,
    pub overall: LeaderboardResponse,
    pub categories: Vec<LeaderboardResponse>,
}
