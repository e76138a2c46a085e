use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::dto::rating::{SubmitRatingRequest, SubmitRatingResponse};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/resorts/{id}/ratings",
    params(
        ("id" = Uuid, Path, description = "Resort id")
    ),
    request_body = SubmitRatingRequest,
    responses(
        (status = 201, description = "Rating stored", body = SubmitRatingResponse),
        (status = 400, description = "Scores outside 1-10 or not in steps of 0.5"),
        (status = 404, description = "Resort not found"),
        (status = 409, description = "Unknown user")
    ),
    tag = "ratings"
)]
pub async fn submit_rating(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitRatingRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let response = services::submit_rating(state.store.as_ref(), id, &req).await?;

    Ok((StatusCode::CREATED, Json(response)).into_response())
}
