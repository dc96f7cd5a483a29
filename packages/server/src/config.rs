use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domains::jobs::providers::ProviderId;

pub const DEFAULT_PROVIDER1_URL: &str = "https://assignment.devotel.io/api/provider1/jobs";
pub const DEFAULT_PROVIDER2_URL: &str = "https://assignment.devotel.io/api/provider2/jobs";
pub const DEFAULT_FETCH_JOBS_CRON: &str = "0 */6 * * *";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub providers: Vec<ProviderConfig>,
    pub scheduler: SchedulerConfig,
    pub pagination: PaginationConfig,
}

/// Where and how to fetch one upstream provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub id: ProviderId,
    pub url: String,
    pub timeout: Duration,
    pub retries: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Five-field cron expression, as operators write it (weekdays 0-7,
    /// Sunday is 0 or 7).
    pub cron_expression: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            cron_expression: DEFAULT_FETCH_JOBS_CRON.to_string(),
            enabled: true,
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let pagination = PaginationConfig {
            default_limit: parse_var("DEFAULT_PAGE_LIMIT", 10)?,
            max_limit: parse_var("MAX_PAGE_LIMIT", 100)?,
        };
        if pagination.default_limit == 0 || pagination.default_limit > pagination.max_limit {
            anyhow::bail!(
                "DEFAULT_PAGE_LIMIT must be between 1 and MAX_PAGE_LIMIT ({})",
                pagination.max_limit
            );
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: parse_var("PORT", 3000)?,
            providers: vec![
                ProviderConfig::from_env(ProviderId::Provider1, "API_PROVIDER1", DEFAULT_PROVIDER1_URL)?,
                ProviderConfig::from_env(ProviderId::Provider2, "API_PROVIDER2", DEFAULT_PROVIDER2_URL)?,
            ],
            scheduler: SchedulerConfig {
                cron_expression: env::var("FETCH_JOBS_CRON")
                    .unwrap_or_else(|_| DEFAULT_FETCH_JOBS_CRON.to_string()),
                enabled: env::var("SCHEDULER_ENABLED")
                    .map(|v| v != "false")
                    .unwrap_or(true),
            },
            pagination,
        })
    }
}

impl ProviderConfig {
    fn from_env(id: ProviderId, prefix: &str, default_url: &str) -> Result<Self> {
        let timeout_ms: u64 = parse_var(&format!("{}_TIMEOUT", prefix), 10_000)?;
        let retries: u32 = parse_var(&format!("{}_RETRIES", prefix), 3)?;

        Ok(Self {
            id,
            url: env::var(format!("{}_URL", prefix)).unwrap_or_else(|_| default_url.to_string()),
            timeout: Duration::from_millis(timeout_ms),
            retries,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", name)),
        Err(_) => Ok(default),
    }
}
