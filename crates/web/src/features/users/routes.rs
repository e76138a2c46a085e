use axum::{Router, routing::post};

use super::handlers::create_user;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/users", post(create_user))
}
