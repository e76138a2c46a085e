use std::sync::Arc;

use anyhow::Context;
use storage::{Database, PgResortStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use web::config::Config;
use web::middleware::auth::ApiKeys;
use web::{AppState, app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting ski resort ratings API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    let settings = config.ranking_settings()?;
    tracing::info!(
        min_votes = settings.min_votes(),
        leaderboard_limit = settings.leaderboard_limit(),
        listing_page_cap = settings.listing_page_cap(),
        "Configuration loaded successfully"
    );

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("API_KEYS is empty; admin endpoints will reject every request");
    }

    let state = AppState::new(Arc::new(PgResortStore::new(db)), settings);

    let router = app(state, api_keys)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    axum::serve(listener, router).await?;

    Ok(())
}
