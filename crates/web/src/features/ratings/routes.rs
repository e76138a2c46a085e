use axum::{Router, routing::post};

use super::handlers::submit_rating;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/resorts/:id/ratings", post(submit_rating))
}
