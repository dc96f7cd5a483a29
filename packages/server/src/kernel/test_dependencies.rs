// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into the ingestor for tests.

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{BaseJobFetcher, FetchError, FetchFailure};
use crate::config::ProviderConfig;
use crate::domains::jobs::activities::JobIngestor;
use crate::domains::jobs::providers::ProviderId;

// =============================================================================
// Mock Job Fetcher
// =============================================================================

/// Serves canned payloads or failures per provider.
///
/// A provider with nothing configured fails with a transport error, the same
/// as an unreachable host.
pub struct MockJobFetcher {
    responses: Arc<Mutex<HashMap<ProviderId, Result<serde_json::Value, FetchFailure>>>>,
    calls: Arc<Mutex<Vec<ProviderId>>>,
}

impl MockJobFetcher {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_payload(self, provider: ProviderId, payload: serde_json::Value) -> Self {
        self.responses.lock().unwrap().insert(provider, Ok(payload));
        self
    }

    pub fn with_failure(self, provider: ProviderId, failure: FetchFailure) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(provider, Err(failure));
        self
    }

    /// Get all providers that were fetched, in call order
    pub fn calls(&self) -> Vec<ProviderId> {
        self.calls.lock().unwrap().clone()
    }

    /// Check if a provider was fetched
    pub fn was_fetched(&self, provider: ProviderId) -> bool {
        self.calls.lock().unwrap().contains(&provider)
    }
}

#[async_trait]
impl BaseJobFetcher for MockJobFetcher {
    async fn fetch(&self, provider: &ProviderConfig) -> Result<serde_json::Value, FetchError> {
        // Record the call
        self.calls.lock().unwrap().push(provider.id);

        let response = self
            .responses
            .lock()
            .unwrap()
            .get(&provider.id)
            .cloned()
            .unwrap_or_else(|| Err(FetchFailure::Transport("connection refused".to_string())));

        response.map_err(|last_cause| FetchError {
            provider: provider.id,
            attempts: provider.retries.max(1),
            last_cause,
        })
    }
}

impl Default for MockJobFetcher {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub job_fetcher: Arc<MockJobFetcher>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            job_fetcher: Arc::new(MockJobFetcher::new()),
        }
    }

    /// Set a mock job fetcher
    pub fn mock_fetcher(mut self, fetcher: MockJobFetcher) -> Self {
        self.job_fetcher = Arc::new(fetcher);
        self
    }

    /// Convert into a JobIngestor for testing
    pub fn into_ingestor(self, db_pool: PgPool, providers: Vec<ProviderConfig>) -> JobIngestor {
        JobIngestor::new(db_pool, self.job_fetcher, providers)
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
