//! Test fixtures for creating test data.
//!
//! Builders for normalized jobs plus raw provider payloads in the shapes the
//! upstream APIs serve.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jobs_core::config::ProviderConfig;
use jobs_core::domains::jobs::models::{Job, UnifiedJob, UpsertOutcome};
use jobs_core::domains::jobs::providers::ProviderId;
use serde_json::{json, Value};
use sqlx::PgPool;

/// A provider1 job with sensible defaults.
pub fn unified_job(external_id: &str, title: &str) -> UnifiedJob {
    UnifiedJob::builder()
        .external_id(external_id)
        .title(title)
        .company("Acme Corp")
        .location("Austin, TX")
        .salary_min(90_000)
        .salary_max(120_000)
        .job_type("Full-Time")
        .skills(vec!["Rust".to_string(), "SQL".to_string()])
        .experience_years(3)
        .posted_date(days_ago(1))
        .source("provider1")
        .build()
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

/// Insert a job and assert it was new.
pub async fn insert_job(job: &UnifiedJob, pool: &PgPool) -> Result<()> {
    let outcome = Job::upsert(job, pool).await?;
    anyhow::ensure!(
        outcome == UpsertOutcome::Inserted,
        "expected insert, got {:?}",
        outcome
    );
    Ok(())
}

/// Provider config pointed at `url` with instant-friendly settings.
pub fn provider_config(id: ProviderId, url: &str, retries: u32) -> ProviderConfig {
    ProviderConfig {
        id,
        url: url.to_string(),
        timeout: std::time::Duration::from_secs(2),
        retries,
    }
}

/// Provider 1 payload with `count` jobs.
pub fn provider1_payload(count: usize) -> Value {
    let jobs: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "jobId": format!("P1-{}", i),
                "title": format!("Backend Engineer {}", i),
                "details": {
                    "location": "Seattle, WA",
                    "type": "Full-Time",
                    "salaryRange": "$90k - $130k"
                },
                "company": { "name": "DataWorks", "industry": "Analytics" },
                "skills": ["Rust", "Postgres"],
                "postedDate": "2025-08-01T10:00:00.000Z"
            })
        })
        .collect();

    json!({
        "metadata": { "requestId": "req-1", "timestamp": "2025-08-01T10:00:00.000Z" },
        "jobs": jobs
    })
}

/// Provider 2 payload with `count` jobs.
pub fn provider2_payload(count: usize) -> Value {
    let mut jobs_list = serde_json::Map::new();
    for i in 0..count {
        jobs_list.insert(
            format!("job-{}", i),
            json!({
                "position": format!("Data Scientist {}", i),
                "location": { "city": "Austin", "state": "TX", "remote": false },
                "compensation": { "min": 80000, "max": 110000, "currency": "USD" },
                "employer": { "companyName": "Creative Design Ltd", "website": "https://cdl.example" },
                "requirements": { "experience": 4, "technologies": ["Python", "SQL"] },
                "datePosted": "2025-08-02"
            }),
        );
    }

    json!({ "status": "success", "data": { "jobsList": jobs_list } })
}
