use storage::{
    ResortStore,
    dto::ranking::{LeaderboardResponse, RankingStats, RankingsOverview},
    error::Result,
    models::Metric,
    services::{RankingSettings, rankings},
};

/// Rankings page: statistics, overall Top-N and every category Top-N
pub async fn get_overview(store: &dyn ResortStore, settings: &RankingSettings) -> Result<RankingsOverview> {
    let snapshot = store.snapshot().await?;
    Ok(rankings::overview(&snapshot, settings))
}

pub async fn get_leaderboard(
    store: &dyn ResortStore,
    settings: &RankingSettings,
    metric: Metric,
    limit: Option<usize>,
    country: Option<&str>,
) -> Result<LeaderboardResponse> {
    let snapshot = store.snapshot().await?;
    let limit = settings.resolve_limit(limit);

    Ok(rankings::leaderboard(&snapshot, metric, settings, limit, country))
}

pub async fn get_stats(store: &dyn ResortStore) -> Result<RankingStats> {
    let snapshot = store.snapshot().await?;
    Ok(rankings::stats(&snapshot))
}
