// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use jobs_core::domains::jobs::activities::JobIngestor;
use jobs_core::domains::jobs::scheduler::IngestionScheduler;
use jobs_core::kernel::scheduled_tasks::start_scheduler;
use jobs_core::kernel::HttpJobFetcher;
use jobs_core::server::{build_app, AppState};
use jobs_core::Config;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,jobs_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Job Data Backend");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        providers = config.providers.len(),
        cron = %config.scheduler.cron_expression,
        scheduler_enabled = config.scheduler.enabled,
        "Configuration loaded"
    );

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // Wire ingestion
    let fetcher = Arc::new(HttpJobFetcher::new()?);
    let ingestor = Arc::new(JobIngestor::new(pool.clone(), fetcher, config.providers));
    let scheduler = Arc::new(IngestionScheduler::new(ingestor, config.scheduler));

    // Keep the handle alive for the lifetime of the server
    let _cron = start_scheduler(scheduler.clone())
        .await
        .context("Failed to start scheduled tasks")?;

    let app = build_app(AppState {
        db_pool: pool,
        scheduler,
        pagination: config.pagination,
    });

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Job offers: http://localhost:{}/api/job-offers", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
