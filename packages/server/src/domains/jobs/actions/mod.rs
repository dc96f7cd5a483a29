//! Jobs domain actions - entry points for the HTTP handlers and CLI.

pub mod queries;

pub use queries::{find_jobs, get_stats, JobSearchParams, JobStatsView};
