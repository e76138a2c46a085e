//! HTTP API for the ski resort ratings service.

pub mod config;
pub mod error;
pub mod features;
pub mod middleware;

use std::sync::Arc;

use axum::Router;
use storage::ResortStore;
use storage::services::RankingSettings;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use features::{admin, rankings, ratings, resorts, users};
use middleware::auth::ApiKeys;

/// Shared handler state. The ranking engine runs per request against a fresh snapshot.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ResortStore>,
    pub settings: RankingSettings,
}

impl AppState {
    pub fn new(store: Arc<dyn ResortStore>, settings: RankingSettings) -> Self {
        Self { store, settings }
    }
}

/// Every `/api` route plus the OpenAPI document and Swagger UI.
pub fn app(state: AppState, api_keys: ApiKeys) -> Router {
    let api = Router::new()
        .merge(rankings::routes::routes())
        .merge(resorts::routes::routes(api_keys.clone()))
        .merge(ratings::routes::routes())
        .merge(users::routes::routes())
        .merge(admin::routes::routes(api_keys));

    Router::new()
        .nest("/api", api)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        rankings::handlers::get_rankings,
        rankings::handlers::get_leaderboard,
        rankings::handlers::get_stats,
        resorts::handlers::list_resorts,
        resorts::handlers::list_countries,
        resorts::handlers::get_resort,
        resorts::handlers::create_resort,
        ratings::handlers::submit_rating,
        users::handlers::create_user,
        admin::handlers::recompute_aggregates,
    ),
    components(
        schemas(
            storage::dto::common::PaginationMeta,
            storage::dto::ranking::LeaderboardEntry,
            storage::dto::ranking::LeaderboardResponse,
            storage::dto::ranking::RankingStats,
            storage::dto::ranking::RankingsOverview,
            storage::dto::ranking::ResortInfo,
            storage::dto::resort::CreateResortRequest,
            storage::dto::resort::ResortResponse,
            storage::dto::resort::ResortSort,
            storage::dto::resort::LocationFacets,
            storage::dto::resort::ResortCatalogResponse,
            storage::dto::resort::CountryCount,
            storage::dto::resort::ResortDetailResponse,
            storage::dto::rating::SubmitRatingRequest,
            storage::dto::rating::SubmitRatingResponse,
            storage::dto::rating::ResortAggregates,
            storage::dto::user::CreateUserRequest,
            storage::dto::user::UserResponse,
            storage::models::Metric,
            storage::models::Rating,
            storage::models::RatingWithAuthor,
            storage::models::CategoryScores,
            storage::services::Bucket,
            storage::services::resort_summary::CategoryAverage,
            admin::handlers::RecomputeResponse,
        )
    ),
    tags(
        (name = "rankings", description = "Shrinkage-ranked leaderboards and statistics"),
        (name = "resorts", description = "Resort catalog"),
        (name = "ratings", description = "Rating submission"),
        (name = "users", description = "User registration"),
        (name = "admin", description = "Administrative endpoints"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}
