// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Normalizing and storing what a fetcher returns belongs to the jobs domain.
//
// Naming convention: Base* for trait names (e.g., BaseJobFetcher)

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ProviderConfig;
use crate::domains::jobs::providers::ProviderId;

// =============================================================================
// Job Fetcher Trait (Infrastructure - upstream provider HTTP)
// =============================================================================

/// Why a single fetch attempt failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The provider answered with a non-success status.
    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    /// No response: connect failure, timeout, reset.
    #[error("network error: {0}")]
    Transport(String),

    /// Anything else, including a body that is not JSON.
    #[error("request error: {0}")]
    Client(String),
}

/// A provider could not be fetched within its retry budget.
#[derive(Error, Debug, Clone)]
#[error("Failed to fetch jobs from {provider} after {attempts} attempts: {last_cause}")]
pub struct FetchError {
    pub provider: ProviderId,
    pub attempts: u32,
    pub last_cause: FetchFailure,
}

#[async_trait]
pub trait BaseJobFetcher: Send + Sync {
    /// Fetch the raw JSON document a provider serves, retrying per its config
    async fn fetch(&self, provider: &ProviderConfig) -> Result<serde_json::Value, FetchError>;
}
