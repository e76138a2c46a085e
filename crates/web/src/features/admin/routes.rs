use axum::{Router, middleware, routing::post};

use super::handlers::recompute_aggregates;
use crate::AppState;
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .route("/admin/resorts/recompute", post(recompute_aggregates))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
