use crate::dto::ranking::{LeaderboardEntry, LeaderboardResponse, RankingStats, RankingsOverview};
use crate::models::{Metric, ResortWithRatings};

use super::{
    DEFAULT_LEADERBOARD_LIMIT, DEFAULT_LISTING_PAGE_CAP, GlobalStatistics,
    LeaderboardBuilder, RankingError, ShrinkageRanker,
};

/// Caller-supplied ranking configuration, validated once at start-up.
#[derive(Debug, Clone, Copy)]
pub struct RankingSettings {
    builder: LeaderboardBuilder,
    leaderboard_limit: usize,
    listing_page_cap: usize,
}

impl RankingSettings {
    pub fn new(
        min_votes: u32,
        leaderboard_limit: usize,
        listing_page_cap: usize,
    ) -> Result<Self, RankingError> {
        let ranker = ShrinkageRanker::new(min_votes)?;

        if leaderboard_limit == 0 || leaderboard_limit > listing_page_cap {
            return Err(RankingError::InvalidLimit {
                limit: leaderboard_limit,
                cap: listing_page_cap,
            });
        }

        Ok(Self {
            builder: LeaderboardBuilder::new(ranker),
            leaderboard_limit,
            listing_page_cap,
        })
    }

    pub fn min_votes(&self) -> u32 {
        self.builder.ranker().min_votes()
    }

    pub fn leaderboard_limit(&self) -> usize {
        self.leaderboard_limit
    }

    pub fn listing_page_cap(&self) -> usize {
        self.listing_page_cap
    }

    pub fn builder(&self) -> &LeaderboardBuilder {
        &self.builder
    }

    /// Requested limit, falling back to the leaderboard size and never above the page cap.
    pub fn resolve_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.leaderboard_limit)
            .min(self.listing_page_cap)
    }
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            builder: LeaderboardBuilder::new(ShrinkageRanker::default()),
            leaderboard_limit: DEFAULT_LEADERBOARD_LIMIT,
            listing_page_cap: DEFAULT_LISTING_PAGE_CAP,
        }
    }
}

/// Rankings page payload: statistics, overall Top-N, then each category's Top-N.
///
/// Every metric is scored independently from the same snapshot.
pub fn overview(snapshot: &[ResortWithRatings], settings: &RankingSettings) -> RankingsOverview {
    let stats = GlobalStatistics::from_snapshot(snapshot);
    let limit = settings.leaderboard_limit();

    let overall = build_response(
        snapshot.iter(),
        Metric::Overall,
        stats.global_average,
        settings,
        limit,
    );

    let categories = Metric::CATEGORIES
        .iter()
        .map(|&metric| build_response(snapshot.iter(), metric, stats.global_average, settings, limit))
        .collect();

    RankingsOverview {
        stats: RankingStats::from(stats),
        overall,
        categories,
    }
}

/// A single leaderboard, optionally restricted to one country.
///
/// The prior stays the global average of the whole snapshot, so a country
/// view ranks resorts exactly as they compare in the global leaderboard.
pub fn leaderboard(
    snapshot: &[ResortWithRatings],
    metric: Metric,
    settings: &RankingSettings,
    limit: usize,
    country: Option<&str>,
) -> LeaderboardResponse {
    let stats = GlobalStatistics::from_snapshot(snapshot);
    let country = country.map(|c| c.trim().to_lowercase());

    let candidates = snapshot.iter().filter(|entry| match &country {
        Some(country) => entry.resort.country.to_lowercase() == *country,
        None => true,
    });

    build_response(candidates, metric, stats.global_average, settings, limit)
}

/// Statistics shown on the home and rankings pages.
pub fn stats(snapshot: &[ResortWithRatings]) -> RankingStats {
    RankingStats::from(GlobalStatistics::from_snapshot(snapshot))
}

fn build_response<'a, I>(
    candidates: I,
    metric: Metric,
    global_average: f64,
    settings: &RankingSettings,
    limit: usize,
) -> LeaderboardResponse
where
    I: IntoIterator<Item = &'a ResortWithRatings>,
{
    let entries = settings
        .builder()
        .build_from(candidates, metric, global_average, limit)
        .iter()
        .map(LeaderboardEntry::from)
        .collect();

    LeaderboardResponse {
        metric,
        label: metric.label().to_string(),
        min_votes: settings.min_votes(),
        global_average,
        entries,
    }
}
