//! One ingestion cycle: fetch, normalize and store every configured provider.
//!
//! ```text
//! run_cycle()
//!   ├─► provider1: fetch ─► transform ─► upsert_many ─┐
//!   └─► provider2: fetch ─► transform ─► upsert_many ─┴─► IngestionSummary
//! ```
//!
//! Provider pipelines run concurrently and share nothing. A provider that
//! cannot be fetched contributes zero counts and an error message; it never
//! stops the others.

use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::ProviderConfig;
use crate::domains::jobs::models::{Job, UpsertReport};
use crate::domains::jobs::providers::{self, ProviderId};
use crate::domains::jobs::scheduler::IngestionCycle;
use crate::kernel::BaseJobFetcher;

/// Outcome for one provider within a cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSummary {
    pub provider: ProviderId,
    /// Records produced by normalization.
    pub fetched: usize,
    /// Records inserted or changed.
    pub stored: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub error: Option<String>,
}

impl ProviderSummary {
    fn from_report(provider: ProviderId, fetched: usize, report: UpsertReport) -> Self {
        Self {
            provider,
            fetched,
            stored: report.written(),
            unchanged: report.unchanged,
            failed: report.failed,
            error: None,
        }
    }

    fn failed(provider: ProviderId, error: String) -> Self {
        Self {
            provider,
            fetched: 0,
            stored: 0,
            unchanged: 0,
            failed: 0,
            error: Some(error),
        }
    }
}

/// Aggregate outcome of a cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionSummary {
    pub total_fetched: usize,
    /// Inserted plus updated; unchanged rows are not counted as stored.
    pub total_stored: usize,
    pub total_unchanged: usize,
    pub total_failed: usize,
    pub providers: Vec<ProviderSummary>,
}

impl IngestionSummary {
    pub fn from_providers(providers: Vec<ProviderSummary>) -> Self {
        let mut summary = Self::default();
        for p in &providers {
            summary.total_fetched += p.fetched;
            summary.total_stored += p.stored;
            summary.total_unchanged += p.unchanged;
            summary.total_failed += p.failed;
        }
        summary.providers = providers;
        summary
    }

    pub fn provider(&self, id: ProviderId) -> Option<&ProviderSummary> {
        self.providers.iter().find(|p| p.provider == id)
    }
}

pub struct JobIngestor {
    db_pool: PgPool,
    fetcher: Arc<dyn BaseJobFetcher>,
    providers: Vec<ProviderConfig>,
}

impl JobIngestor {
    pub fn new(
        db_pool: PgPool,
        fetcher: Arc<dyn BaseJobFetcher>,
        providers: Vec<ProviderConfig>,
    ) -> Self {
        Self {
            db_pool,
            fetcher,
            providers,
        }
    }

    /// Run every provider pipeline and aggregate the results.
    pub async fn run_all(&self) -> IngestionSummary {
        info!(providers = self.providers.len(), "Starting job ingestion cycle");

        let summaries = join_all(self.providers.iter().map(|p| self.ingest_provider(p))).await;
        let summary = IngestionSummary::from_providers(summaries);

        info!(
            total_fetched = summary.total_fetched,
            total_stored = summary.total_stored,
            total_unchanged = summary.total_unchanged,
            total_failed = summary.total_failed,
            "Job ingestion cycle complete"
        );

        summary
    }

    async fn ingest_provider(&self, provider: &ProviderConfig) -> ProviderSummary {
        let payload = match self.fetcher.fetch(provider).await {
            Ok(payload) => payload,
            Err(e) => {
                error!(provider = %provider.id, error = %e, "Provider fetch failed, skipping");
                return ProviderSummary::failed(provider.id, e.to_string());
            }
        };

        let jobs = providers::transform(provider.id, payload);
        let report = Job::upsert_many(&jobs, &self.db_pool).await;

        info!(
            provider = %provider.id,
            fetched = jobs.len(),
            inserted = report.inserted,
            updated = report.updated,
            unchanged = report.unchanged,
            failed = report.failed,
            "Provider ingestion complete"
        );

        ProviderSummary::from_report(provider.id, jobs.len(), report)
    }
}

#[async_trait]
impl IngestionCycle for JobIngestor {
    async fn run_cycle(&self) -> Result<IngestionSummary> {
        Ok(self.run_all().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_aggregates_providers() {
        let summary = IngestionSummary::from_providers(vec![
            ProviderSummary::failed(ProviderId::Provider1, "boom".to_string()),
            ProviderSummary::from_report(
                ProviderId::Provider2,
                5,
                UpsertReport {
                    inserted: 2,
                    updated: 1,
                    unchanged: 1,
                    failed: 1,
                },
            ),
        ]);

        assert_eq!(summary.total_fetched, 5);
        assert_eq!(summary.total_stored, 3);
        assert_eq!(summary.total_unchanged, 1);
        assert_eq!(summary.total_failed, 1);
        assert_eq!(
            summary.provider(ProviderId::Provider1).and_then(|p| p.error.as_deref()),
            Some("boom")
        );
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let json = serde_json::to_value(IngestionSummary::default()).unwrap();
        assert_eq!(json["totalFetched"], 0);
        assert_eq!(json["totalStored"], 0);
        assert!(json["providers"].as_array().unwrap().is_empty());
    }
}
