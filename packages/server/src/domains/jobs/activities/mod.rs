//! Jobs domain activities
//!
//! Business logic for pulling provider data into the catalog.

pub mod ingest;

pub use ingest::{IngestionSummary, JobIngestor, ProviderSummary};
