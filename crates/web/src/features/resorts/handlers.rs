use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::dto::resort::{
    CountryCount, CreateResortRequest, ResortCatalogResponse, ResortDetailResponse, ResortFilter,
    ResortResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/resorts",
    params(ResortFilter),
    responses(
        (status = 200, description = "One page of the resort catalog", body = ResortCatalogResponse),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "resorts"
)]
pub async fn list_resorts(
    State(state): State<AppState>,
    Query(filter): Query<ResortFilter>,
) -> Result<Response, WebError> {
    filter
        .validate(state.settings.listing_page_cap())
        .map_err(WebError::BadRequest)?;

    let catalog = services::search_resorts(state.store.as_ref(), &filter).await?;

    Ok(Json(catalog).into_response())
}

#[utoipa::path(
    get,
    path = "/api/resorts/countries",
    responses(
        (status = 200, description = "Countries with their number of resorts", body = Vec<CountryCount>)
    ),
    tag = "resorts"
)]
pub async fn list_countries(State(state): State<AppState>) -> Result<Response, WebError> {
    let countries = services::list_countries(state.store.as_ref()).await?;

    Ok(Json(countries).into_response())
}

#[utoipa::path(
    get,
    path = "/api/resorts/{id}",
    params(
        ("id" = Uuid, Path, description = "Resort id")
    ),
    responses(
        (status = 200, description = "Resort with ratings and category averages", body = ResortDetailResponse),
        (status = 404, description = "Resort not found")
    ),
    tag = "resorts"
)]
pub async fn get_resort(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let detail = services::get_resort_detail(state.store.as_ref(), id).await?;

    Ok(Json(detail).into_response())
}

#[utoipa::path(
    post,
    path = "/api/resorts",
    request_body = CreateResortRequest,
    responses(
        (status = 201, description = "Resort created", body = ResortResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized - invalid or missing API key"),
        (status = 409, description = "A resort with this name already exists in this country")
    ),
    tag = "resorts",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_resort(
    State(state): State<AppState>,
    Json(req): Json<CreateResortRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let resort = services::create_resort(state.store.as_ref(), &req).await?;

    Ok((StatusCode::CREATED, Json(ResortResponse::from(resort))).into_response())
}
