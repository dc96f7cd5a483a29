//! HTTP job fetcher - GETs a provider's JSON document with retries.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, error};

use super::retry::{retry_with_backoff, RetryPolicy};
use super::{BaseJobFetcher, FetchError, FetchFailure};
use crate::config::ProviderConfig;

const USER_AGENT: &str = "Job-Data-Backend/1.0.0";

pub struct HttpJobFetcher {
    client: reqwest::Client,
    base_delay: Duration,
}

impl HttpJobFetcher {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_delay: Duration::from_secs(1),
        })
    }

    /// Override the backoff base (tests use milliseconds).
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    async fn fetch_once(
        &self,
        provider: &ProviderConfig,
        attempt: u32,
    ) -> Result<serde_json::Value, FetchFailure> {
        let response = self
            .client
            .get(&provider.url)
            .timeout(provider.timeout)
            .send()
            .await
            .map_err(|e| classify(provider, attempt, e))?;

        let status = response.status();
        debug!(
            provider = %provider.id,
            method = "GET",
            url = %provider.url,
            status = status.as_u16(),
            attempt,
            "Provider response"
        );

        if !status.is_success() {
            let failure = FetchFailure::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            };
            error!(provider = %provider.id, attempt, "Provider returned {}", failure);
            return Err(failure);
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| classify(provider, attempt, e))
    }
}

fn classify(provider: &ProviderConfig, attempt: u32, e: reqwest::Error) -> FetchFailure {
    if e.is_connect() || e.is_timeout() || e.is_request() {
        error!(provider = %provider.id, attempt, error = %e, "Network error fetching provider");
        FetchFailure::Transport(e.to_string())
    } else {
        error!(provider = %provider.id, attempt, error = %e, "Request error fetching provider");
        FetchFailure::Client(e.to_string())
    }
}

#[async_trait]
impl BaseJobFetcher for HttpJobFetcher {
    async fn fetch(&self, provider: &ProviderConfig) -> Result<serde_json::Value, FetchError> {
        let policy = RetryPolicy::new(provider.retries).with_base_delay(self.base_delay);
        let label = format!("Fetch from {}", provider.id);

        retry_with_backoff(policy, &label, |attempt| self.fetch_once(provider, attempt))
            .await
            .map_err(|e| FetchError {
                provider: provider.id,
                attempts: e.attempts,
                last_cause: e.last_error,
            })
    }
}
