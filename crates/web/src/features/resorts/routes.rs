use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{create_resort, get_resort, list_countries, list_resorts};
use crate::AppState;
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/resorts", post(create_resort))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/resorts", get(list_resorts))
        .route("/resorts/countries", get(list_countries))
        .route("/resorts/:id", get(get_resort))
        .merge(protected)
}
