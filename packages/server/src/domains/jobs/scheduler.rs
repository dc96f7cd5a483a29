//! Single-flight gate in front of the ingestion cycle.
//!
//! ```text
//!            trigger_fetch() / on_timer()
//!   Idle ───────────────────────────────────► Running
//!    ▲                                           │
//!    └──────── cycle finished (ok, err, panic) ──┘
//!
//!   While Running:
//!     trigger_fetch() -> Err(JobsError::SchedulerBusy)
//!     on_timer()      -> TimerOutcome::Skipped (no error)
//! ```
//!
//! Both trigger paths call the same [`IngestionCycle::run_cycle`]. The cycle
//! runs on its own task and owns the running flag, so a caller that goes away
//! mid-cycle (dropped HTTP request, aborted task) neither cancels the cycle
//! nor releases the flag early.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use super::activities::IngestionSummary;
use super::errors::JobsError;
use crate::config::SchedulerConfig;

/// Something that can run one full ingestion cycle
#[async_trait]
pub trait IngestionCycle: Send + Sync {
    async fn run_cycle(&self) -> Result<IngestionSummary>;
}

/// Read-only view of the scheduler
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerStatus {
    pub is_running: bool,
    pub enabled: bool,
    pub cron_expression: String,
}

/// What a timer tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerOutcome {
    /// Scheduling is turned off in config.
    Disabled,
    /// A cycle was already in flight.
    Skipped,
    Completed(IngestionSummary),
    Failed(String),
}

pub struct IngestionScheduler {
    runner: Arc<dyn IngestionCycle>,
    config: SchedulerConfig,
    running: Arc<AtomicBool>,
}

/// Holds the running flag; clears it when dropped.
struct RunningGuard {
    flag: Arc<AtomicBool>,
}

impl RunningGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag: flag.clone() })
    }
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl IngestionScheduler {
    pub fn new(runner: Arc<dyn IngestionCycle>, config: SchedulerConfig) -> Self {
        Self {
            runner,
            config,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn cron_expression(&self) -> &str {
        &self.config.cron_expression
    }

    pub fn status(&self) -> SchedulerStatus {
        SchedulerStatus {
            is_running: self.is_running(),
            enabled: self.config.enabled,
            cron_expression: self.config.cron_expression.clone(),
        }
    }

    /// Run a cycle now on behalf of a caller.
    ///
    /// Works even when timer scheduling is disabled.
    pub async fn trigger_fetch(&self) -> Result<IngestionSummary, JobsError> {
        let guard = RunningGuard::acquire(&self.running).ok_or(JobsError::SchedulerBusy)?;

        info!("Manual job fetch triggered");
        self.run_detached(guard).await.map_err(|e| {
            error!(error = %e, "Manual job fetch failed");
            JobsError::Internal(e)
        })
    }

    /// Timer entry point. Never returns an error; failures are logged.
    pub async fn on_timer(&self) -> TimerOutcome {
        if !self.config.enabled {
            info!("Job fetch scheduler is disabled, skipping tick");
            return TimerOutcome::Disabled;
        }

        let Some(guard) = RunningGuard::acquire(&self.running) else {
            warn!("Job fetch already in progress, skipping scheduled run");
            return TimerOutcome::Skipped;
        };

        info!("Starting scheduled job fetch");
        let started = Instant::now();

        match self.run_detached(guard).await {
            Ok(summary) => {
                info!(
                    duration_ms = started.elapsed().as_millis() as u64,
                    total_fetched = summary.total_fetched,
                    total_stored = summary.total_stored,
                    "Scheduled job fetch completed"
                );
                TimerOutcome::Completed(summary)
            }
            Err(e) => {
                error!(
                    duration_ms = started.elapsed().as_millis() as u64,
                    error = %e,
                    "Scheduled job fetch failed"
                );
                TimerOutcome::Failed(e.to_string())
            }
        }
    }

    /// Runs the cycle on a spawned task that owns `guard`. The flag clears
    /// when the cycle ends, whether or not anyone is still awaiting it.
    async fn run_detached(&self, guard: RunningGuard) -> Result<IngestionSummary> {
        let runner = self.runner.clone();
        let handle = tokio::spawn(async move {
            let _guard = guard;
            runner.run_cycle().await
        });

        match handle.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => Err(anyhow!("Ingestion cycle panicked")),
            Err(e) => Err(anyhow!("Ingestion cycle task failed: {}", e)),
        }
    }
}
