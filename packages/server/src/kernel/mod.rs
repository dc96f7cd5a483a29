//! Kernel module - server infrastructure and dependencies.

pub mod http_fetcher;
pub mod retry;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use http_fetcher::HttpJobFetcher;
pub use retry::{retry_with_backoff, RetryError, RetryPolicy};
pub use test_dependencies::{MockJobFetcher, TestDependencies};
pub use traits::*;
