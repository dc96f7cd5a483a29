//! One-shot CLI for the ingestion pipeline
//!
//! Runs migrations, then either executes exactly one ingestion cycle or
//! prints catalog stats. Output is JSON on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jobs_core::config::Config;
use jobs_core::domains::jobs::actions::get_stats;
use jobs_core::domains::jobs::activities::JobIngestor;
use jobs_core::domains::jobs::providers::ProviderId;
use jobs_core::domains::jobs::scheduler::IngestionScheduler;
use jobs_core::kernel::HttpJobFetcher;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "fetch_jobs")]
#[command(about = "Fetch job listings from providers once and store them")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one ingestion cycle
    Run {
        /// Only fetch this provider (provider1 or provider2)
        #[arg(long)]
        provider: Option<ProviderId>,
    },

    /// Print catalog stats
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,jobs_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let pool = connect(&config.database_url).await?;

    let output = match cli.command {
        Commands::Run { provider } => {
            let providers = config
                .providers
                .into_iter()
                .filter(|p| provider.map_or(true, |only| p.id == only))
                .collect();

            let fetcher = Arc::new(HttpJobFetcher::new()?);
            let ingestor = Arc::new(JobIngestor::new(pool, fetcher, providers));
            let scheduler = IngestionScheduler::new(ingestor, config.scheduler);

            let summary = scheduler.trigger_fetch().await?;
            serde_json::to_string_pretty(&summary)?
        }
        Commands::Stats => {
            let stats = get_stats(&pool).await?;
            serde_json::to_string_pretty(&stats)?
        }
    };

    println!("{}", output);
    Ok(())
}

async fn connect(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(pool)
}
