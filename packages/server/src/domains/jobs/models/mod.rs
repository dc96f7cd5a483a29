pub mod job;
pub mod job_query;

pub use job::*;
pub use job_query::*;
