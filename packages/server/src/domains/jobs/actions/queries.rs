//! Read-side actions: search and stats.
//!
//! Actions take raw caller input, validate it, and return final views.
//! Bad input is rejected here, before any SQL runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::PgPool;
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

use crate::common::{Paginated, PaginationArgs};
use crate::config::PaginationConfig;
use crate::domains::jobs::errors::JobsError;
use crate::domains::jobs::models::{Job, JobFilters, JobQuery, JobSort, SourceCount};

/// Raw search input as it arrives on the query string
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSearchParams {
    pub title: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_salary: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub max_salary: Option<i32>,
    pub job_type: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub remote: Option<bool>,
    pub skills: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_experience: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub max_experience: Option<i32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<u32>,
}

/// `?minSalary=` means "no filter", the same as leaving the key out.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

impl JobSearchParams {
    /// Validate everything and build the store query.
    pub fn into_query(self, pagination: &PaginationConfig) -> Result<JobQuery, JobsError> {
        let sort = JobSort::parse(self.sort_by.as_deref(), self.sort_order.as_deref())?;
        let page = PaginationArgs {
            page: self.page,
            limit: self.limit,
        }
        .validate(pagination)
        .map_err(|e| JobsError::InvalidPagination(e.to_string()))?;

        let filters = JobFilters {
            title: self.title,
            location: self.location,
            company: self.company,
            min_salary: self.min_salary,
            max_salary: self.max_salary,
            job_type: self.job_type,
            remote: self.remote,
            skills: self.skills,
            min_experience: self.min_experience,
            max_experience: self.max_experience,
        };
        // Surface filter errors before touching the pool.
        filters.predicates()?;

        Ok(JobQuery {
            filters,
            sort,
            page,
        })
    }
}

/// Search the catalog
pub async fn find_jobs(
    params: JobSearchParams,
    pagination: &PaginationConfig,
    pool: &PgPool,
) -> Result<Paginated<Job>, JobsError> {
    let query = params.into_query(pagination)?;
    debug!(?query, "Searching jobs");

    let (jobs, total) = Job::find_page(&query, pool).await?;
    Ok(Paginated::new(jobs, &query.page, total))
}

/// Catalog stats as returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatsView {
    pub total: i64,
    pub by_source: Vec<SourceCount>,
    pub recent_count: i64,
    /// When these numbers were computed.
    pub last_updated: DateTime<Utc>,
}

pub async fn get_stats(pool: &PgPool) -> Result<JobStatsView, JobsError> {
    let now = Utc::now();
    let stats = Job::stats(now, pool).await?;

    Ok(JobStatsView {
        total: stats.total,
        by_source: stats.by_source,
        recent_count: stats.recent_count,
        last_updated: now,
    })
}
