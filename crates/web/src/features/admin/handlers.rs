use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;
use crate::error::WebError;

use super::services;

#[derive(Debug, Serialize, ToSchema)]
pub struct RecomputeResponse {
    pub resorts_updated: u64,
}

#[utoipa::path(
    post,
    path = "/api/admin/resorts/recompute",
    responses(
        (status = 200, description = "Cached aggregates rebuilt", body = RecomputeResponse),
        (status = 401, description = "Unauthorized - invalid or missing API key")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn recompute_aggregates(State(state): State<AppState>) -> Result<Response, WebError> {
    let resorts_updated = services::recompute_aggregates(state.store.as_ref()).await?;

    Ok(Json(RecomputeResponse { resorts_updated }).into_response())
}
