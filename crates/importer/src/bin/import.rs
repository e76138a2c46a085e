use clap::{Parser, Subcommand};
use importer::{
    ImporterError, Result,
    canonical::{
        models::CanonicalFormat,
        transformer::CanonicalTransformer,
        validator::CanonicalValidator,
    },
    report::format_leaderboard,
};
use std::path::{Path, PathBuf};
use storage::{
    Database, PgResortStore, ResortStore,
    models::Metric,
    services::{
        DEFAULT_LEADERBOARD_LIMIT, DEFAULT_LISTING_PAGE_CAP, DEFAULT_MIN_VOTES, RankingSettings,
        rankings,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "import")]
#[command(about = "Ski resort catalog importer and ranking tools", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Import one canonical resort file
    Resorts {
        file: PathBuf,

        #[arg(long)]
        validate_only: bool,
    },
    /// Import every canonical file in a directory
    BulkImport {
        #[arg(long, default_value = "./imports")]
        directory: PathBuf,

        #[arg(long)]
        validate_only: bool,
    },
    /// Rebuild the cached rating aggregates of every resort
    Recompute,
    /// Print a leaderboard computed from the current ratings
    Leaderboard {
        #[arg(long, default_value = "overall")]
        metric: Metric,

        #[arg(long, default_value_t = DEFAULT_LEADERBOARD_LIMIT)]
        limit: usize,

        #[arg(long)]
        country: Option<String>,

        #[arg(long, env = "MIN_VOTES", default_value_t = DEFAULT_MIN_VOTES)]
        min_votes: u32,
    },
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("import={},importer={},storage={}", log_level, log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Resorts {
            file,
            validate_only,
        } => {
            handle_resort_import(&file, validate_only, &cli.database_url).await?;
        }
        Commands::BulkImport {
            directory,
            validate_only,
        } => {
            handle_bulk_import(directory, validate_only, &cli.database_url).await?;
        }
        Commands::Recompute => {
            handle_recompute(&cli.database_url).await?;
        }
        Commands::Leaderboard {
            metric,
            limit,
            country,
            min_votes,
        } => {
            handle_leaderboard(metric, limit, country, min_votes, &cli.database_url).await?;
        }
    }

    Ok(())
}

async fn connect(database_url: &str) -> Result<Database> {
    tracing::info!("Connecting to database...");
    let db = Database::new(database_url).await?;
    db.run_migrations().await?;
    Ok(db)
}

async fn handle_resort_import(
    file: &Path,
    validate_only: bool,
    database_url: &str,
) -> Result<()> {
    tracing::info!("Loading canonical JSON from: {}", file.display());

    let canonical = load_canonical(file).await?;

    tracing::info!(
        "Loaded {} resort(s) from {} (v{})",
        canonical.resorts.len(),
        canonical.source.extractor,
        canonical.format_version
    );

    tracing::info!("Validating canonical format...");
    let validation_report = CanonicalValidator::validate(&canonical)?;
    validation_report.log_warnings();
    tracing::info!("✓ Validation successful!");

    if validate_only {
        return Ok(());
    }

    let db = connect(database_url).await?;
    let summary = CanonicalTransformer::new(db.pool())
        .import_to_database(canonical)
        .await?;

    tracing::info!(
        "✓ Import completed: {} inserted, {} updated",
        summary.inserted,
        summary.updated
    );

    Ok(())
}

async fn handle_bulk_import(
    directory: PathBuf,
    validate_only: bool,
    database_url: &str,
) -> Result<()> {
    tracing::info!("Scanning directory for canonical JSON files: {}", directory.display());

    let mut json_files = Vec::new();
    let mut entries = tokio::fs::read_dir(&directory).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_dir() {
            let mut sub_entries = tokio::fs::read_dir(&path).await?;
            while let Some(sub_entry) = sub_entries.next_entry().await? {
                let sub_path = sub_entry.path();
                if is_json(&sub_path) {
                    json_files.push(sub_path);
                }
            }
        } else if is_json(&path) {
            json_files.push(path);
        }
    }

    if json_files.is_empty() {
        tracing::warn!("No JSON files found in {}", directory.display());
        return Ok(());
    }

    json_files.sort();
    tracing::info!("Found {} canonical JSON file(s)", json_files.len());

    let db = if !validate_only {
        Some(connect(database_url).await?)
    } else {
        None
    };

    let mut success_count = 0;
    let mut error_count = 0;

    for (idx, file_path) in json_files.iter().enumerate() {
        tracing::info!("[{}/{}] Processing: {}", idx + 1, json_files.len(), file_path.display());

        match process_canonical_file(file_path, db.as_ref()).await {
            Ok(_) => {
                success_count += 1;
                tracing::info!("  ✓ Success");
            }
            Err(e) => {
                error_count += 1;
                tracing::error!("  ✗ Error: {}", e);
            }
        }
    }

    tracing::info!("Summary: {} succeeded, {} failed", success_count, error_count);

    if error_count > 0 {
        return Err(ImporterError::ImportError(format!(
            "{} file(s) failed to import",
            error_count
        )));
    }

    Ok(())
}

async fn process_canonical_file(
    file_path: &Path,
    db: Option<&Database>,
) -> Result<()> {
    let canonical = load_canonical(file_path).await?;

    let validation_report = CanonicalValidator::validate(&canonical)?;
    for warning in &validation_report.warnings {
        tracing::warn!("  {}", warning);
    }

    if let Some(db) = db {
        let summary = CanonicalTransformer::new(db.pool())
            .import_to_database(canonical)
            .await?;
        tracing::info!("  {} inserted, {} updated", summary.inserted, summary.updated);
    }

    Ok(())
}

async fn handle_recompute(database_url: &str) -> Result<()> {
    let store = PgResortStore::new(connect(database_url).await?);
    let updated = store.recompute_aggregates().await?;

    tracing::info!("✓ Recomputed cached aggregates for {} resort(s)", updated);

    Ok(())
}

async fn handle_leaderboard(
    metric: Metric,
    limit: usize,
    country: Option<String>,
    min_votes: u32,
    database_url: &str,
) -> Result<()> {
    let settings = RankingSettings::new(min_votes, DEFAULT_LEADERBOARD_LIMIT, DEFAULT_LISTING_PAGE_CAP)?;
    if limit == 0 {
        return Err(ImporterError::ValidationError(
            "limit must be at least 1".to_string(),
        ));
    }

    let store = PgResortStore::new(connect(database_url).await?);
    let snapshot = store.snapshot().await?;

    let leaderboard = rankings::leaderboard(
        &snapshot,
        metric,
        &settings,
        settings.resolve_limit(Some(limit)),
        country.as_deref(),
    );

    print!("{}", format_leaderboard(&leaderboard));

    Ok(())
}

async fn load_canonical(file: &Path) -> Result<CanonicalFormat> {
    let json_content = tokio::fs::read_to_string(file).await?;
    Ok(serde_json::from_str(&json_content)?)
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}
