use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    dto::ranking::{LeaderboardFilter, LeaderboardResponse, RankingStats, RankingsOverview},
    models::Metric,
};

use crate::AppState;
use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/rankings",
    responses(
        (status = 200, description = "Overall and per-category leaderboards", body = RankingsOverview)
    ),
    tag = "rankings"
)]
pub async fn get_rankings(State(state): State<AppState>) -> Result<Response, WebError> {
    let overview = services::get_overview(state.store.as_ref(), &state.settings).await?;

    Ok(Json(overview).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rankings/{metric}",
    params(
        ("metric" = Metric, Path, description = "overall or one of the seven categories"),
        LeaderboardFilter
    ),
    responses(
        (status = 200, description = "Leaderboard for one metric", body = LeaderboardResponse),
        (status = 400, description = "Unknown metric or invalid query parameters")
    ),
    tag = "rankings"
)]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Path(metric): Path<String>,
    Query(filter): Query<LeaderboardFilter>,
) -> Result<Response, WebError> {
    let metric: Metric = metric.parse().map_err(WebError::BadRequest)?;
    filter
        .validate(state.settings.listing_page_cap())
        .map_err(WebError::BadRequest)?;

    let leaderboard = services::get_leaderboard(
        state.store.as_ref(),
        &state.settings,
        metric,
        filter.limit.map(|l| l as usize),
        filter.country.as_deref(),
    )
    .await?;

    Ok(Json(leaderboard).into_response())
}

#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Catalog statistics", body = RankingStats)
    ),
    tag = "rankings"
)]
pub async fn get_stats(State(state): State<AppState>) -> Result<Response, WebError> {
    let stats = services::get_stats(state.store.as_ref()).await?;

    Ok(Json(stats).into_response())
}
