// Job Data Backend - ingestion core
//
// Aggregates job listings from external providers into one normalized
// Postgres catalog, refreshed on a cron schedule, and serves filtered,
// sorted and paginated reads over it.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
