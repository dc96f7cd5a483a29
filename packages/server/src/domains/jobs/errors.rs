use thiserror::Error;

/// Caller-visible errors of the jobs domain
#[derive(Error, Debug)]
pub enum JobsError {
    #[error("Job fetch is already running")]
    SchedulerBusy,

    #[error("Invalid sort field: {0}")]
    InvalidSortField(String),

    #[error("Invalid sort order: {0}")]
    InvalidSortOrder(String),

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl JobsError {
    /// Malformed query input, as opposed to a server-side failure.
    pub fn is_invalid_query(&self) -> bool {
        matches!(
            self,
            JobsError::InvalidSortField(_)
                | JobsError::InvalidSortOrder(_)
                | JobsError::InvalidPagination(_)
                | JobsError::InvalidFilter(_)
        )
    }
}
