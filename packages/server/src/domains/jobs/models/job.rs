use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::warn;
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// Window used for the "recent" count in [`JobStats`].
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Provider-agnostic job record produced by normalization.
///
/// Transient: built by a provider transform, then persisted with
/// [`Job::upsert`]. `(source, external_id)` is its natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedJob {
    #[builder(setter(into))]
    pub external_id: String,
    #[builder(setter(into))]
    pub title: String,
    #[builder(setter(into))]
    pub company: String,
    #[builder(setter(into))]
    pub location: String,
    #[builder(default, setter(strip_option))]
    pub salary_min: Option<i32>,
    #[builder(default, setter(strip_option))]
    pub salary_max: Option<i32>,
    #[builder(default = "USD".to_string(), setter(into))]
    pub salary_currency: String,
    #[builder(default, setter(into, strip_option))]
    pub job_type: Option<String>,
    #[builder(default)]
    pub skills: Vec<String>,
    #[builder(default = false)]
    pub is_remote: bool,
    #[builder(default, setter(strip_option))]
    pub experience_years: Option<i32>,
    #[builder(default, setter(into, strip_option))]
    pub company_website: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub company_industry: Option<String>,
    pub posted_date: DateTime<Utc>,
    #[builder(setter(into))]
    pub source: String,
}

/// Job - a persisted, normalized listing
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub external_id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub salary_currency: String,
    pub job_type: Option<String>,
    pub skills: Vec<String>,
    pub is_remote: bool,
    pub experience_years: Option<i32>,
    pub company_website: Option<String>,
    pub company_industry: Option<String>,
    pub posted_date: DateTime<Utc>,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a single upsert did to the row behind the natural key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    /// Row exists and every field already matches; nothing was written.
    Unchanged,
}

/// Tally of a batch upsert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertReport {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl UpsertReport {
    /// Rows actually written (inserted or changed).
    pub fn written(&self) -> usize {
        self.inserted + self.updated
    }

    fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Inserted => self.inserted += 1,
            UpsertOutcome::Updated => self.updated += 1,
            UpsertOutcome::Unchanged => self.unchanged += 1,
        }
    }
}

/// Per-source row count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SourceCount {
    pub source: String,
    pub count: i64,
}

/// Aggregate counts over the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
    pub total: i64,
    pub by_source: Vec<SourceCount>,
    pub recent_count: i64,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Job {
    /// Insert or update one job by `(source, external_id)`.
    ///
    /// The update only fires when at least one column differs, so re-ingesting
    /// an identical record touches nothing (not even `updated_at`).
    pub async fn upsert(job: &UnifiedJob, pool: &PgPool) -> Result<UpsertOutcome> {
        let inserted = sqlx::query_scalar::<_, bool>(
            r#"
            INSERT INTO jobs (
                external_id, title, company, location,
                salary_min, salary_max, salary_currency, job_type,
                skills, is_remote, experience_years,
                company_website, company_industry, posted_date, source
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (source, external_id) DO UPDATE SET
                title = EXCLUDED.title,
                company = EXCLUDED.company,
                location = EXCLUDED.location,
                salary_min = EXCLUDED.salary_min,
                salary_max = EXCLUDED.salary_max,
                salary_currency = EXCLUDED.salary_currency,
                job_type = EXCLUDED.job_type,
                skills = EXCLUDED.skills,
                is_remote = EXCLUDED.is_remote,
                experience_years = EXCLUDED.experience_years,
                company_website = EXCLUDED.company_website,
                company_industry = EXCLUDED.company_industry,
                posted_date = EXCLUDED.posted_date,
                updated_at = NOW()
            WHERE (
                jobs.title, jobs.company, jobs.location,
                jobs.salary_min, jobs.salary_max, jobs.salary_currency, jobs.job_type,
                jobs.skills, jobs.is_remote, jobs.experience_years,
                jobs.company_website, jobs.company_industry, jobs.posted_date
            ) IS DISTINCT FROM (
                EXCLUDED.title, EXCLUDED.company, EXCLUDED.location,
                EXCLUDED.salary_min, EXCLUDED.salary_max, EXCLUDED.salary_currency, EXCLUDED.job_type,
                EXCLUDED.skills, EXCLUDED.is_remote, EXCLUDED.experience_years,
                EXCLUDED.company_website, EXCLUDED.company_industry, EXCLUDED.posted_date
            )
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(&job.external_id)
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(&job.salary_currency)
        .bind(&job.job_type)
        .bind(&job.skills)
        .bind(job.is_remote)
        .bind(job.experience_years)
        .bind(&job.company_website)
        .bind(&job.company_industry)
        .bind(job.posted_date)
        .bind(&job.source)
        .fetch_optional(pool)
        .await?;

        Ok(match inserted {
            Some(true) => UpsertOutcome::Inserted,
            Some(false) => UpsertOutcome::Updated,
            None => UpsertOutcome::Unchanged,
        })
    }

    /// Upsert a batch, one statement per job.
    ///
    /// A failing record is logged and counted in `failed`; the rest of the
    /// batch still runs.
    pub async fn upsert_many(jobs: &[UnifiedJob], pool: &PgPool) -> UpsertReport {
        let mut report = UpsertReport::default();

        for job in jobs {
            match Self::upsert(job, pool).await {
                Ok(outcome) => report.record(outcome),
                Err(e) => {
                    warn!(
                        source = %job.source,
                        external_id = %job.external_id,
                        error = %e,
                        "Failed to store job"
                    );
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Find a job by its natural key
    pub async fn find_by_natural_key(
        source: &str,
        external_id: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let job = sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs WHERE source = $1 AND external_id = $2",
        )
        .bind(source)
        .bind(external_id)
        .fetch_optional(pool)
        .await?;
        Ok(job)
    }

    /// Count all jobs
    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Aggregate stats as of `now`.
    pub async fn stats(now: DateTime<Utc>, pool: &PgPool) -> Result<JobStats> {
        let total = Self::count(pool).await?;

        let by_source = sqlx::query_as::<_, SourceCount>(
            "SELECT source, COUNT(*) AS count FROM jobs GROUP BY source ORDER BY source",
        )
        .fetch_all(pool)
        .await?;

        let recent_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs WHERE posted_date >= $1")
                .bind(now - Duration::days(RECENT_WINDOW_DAYS))
                .fetch_one(pool)
                .await?;

        Ok(JobStats {
            total,
            by_source,
            recent_count,
        })
    }
}
