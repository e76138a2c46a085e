use axum::{Router, routing::get};

use super::handlers::{get_leaderboard, get_rankings, get_stats};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rankings", get(get_rankings))
        .route("/rankings/:metric", get(get_leaderboard))
        .route("/stats", get(get_stats))
}
