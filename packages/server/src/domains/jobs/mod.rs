//! Job listings domain: provider normalization, storage, ingestion and
//! scheduling.

pub mod actions;
pub mod activities;
pub mod errors;
pub mod models;
pub mod providers;
pub mod scheduler;

pub use errors::JobsError;
pub use models::{Job, JobFilters, JobQuery, JobSort, JobStats, UnifiedJob};
pub use providers::ProviderId;
pub use scheduler::{IngestionCycle, IngestionScheduler, SchedulerStatus, TimerOutcome};
