//! Provider 1: a `jobs` list with nested details and a free-text salary range.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::parsing::{
    is_remote_location, null_as_default, parse_posted_date, parse_salary_range, SalaryRange,
};
use super::ProviderId;
use crate::domains::jobs::models::UnifiedJob;

#[derive(Debug, Clone, Deserialize)]
pub struct Provider1Response {
    #[serde(default)]
    pub metadata: Option<Provider1Metadata>,
    pub jobs: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider1Metadata {
    pub request_id: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider1Job {
    pub job_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub details: Provider1Details,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: Provider1Company,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    pub posted_date: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider1Details {
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub salary_range: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Provider1Company {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub industry: Option<String>,
}

pub fn transform(response: Provider1Response) -> Vec<UnifiedJob> {
    if let Some(metadata) = &response.metadata {
        debug!(
            request_id = ?metadata.request_id,
            records = response.jobs.len(),
            "Normalizing Provider 1 payload"
        );
    }

    response
        .jobs
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Provider1Job>(record) {
            Ok(job) => normalize(job),
            Err(e) => {
                warn!(provider = %ProviderId::Provider1, error = %e, "Skipping malformed job record");
                None
            }
        })
        .collect()
}

fn normalize(job: Provider1Job) -> Option<UnifiedJob> {
    let Some(posted_date) = parse_posted_date(&job.posted_date) else {
        warn!(
            provider = %ProviderId::Provider1,
            external_id = %job.job_id,
            posted_date = %job.posted_date,
            "Skipping job with unparsable posted date"
        );
        return None;
    };

    let salary = job
        .details
        .salary_range
        .as_deref()
        .map(parse_salary_range)
        .unwrap_or_else(SalaryRange::unknown);

    Some(UnifiedJob {
        is_remote: is_remote_location(&job.details.location),
        external_id: job.job_id,
        title: job.title,
        company: job.company.name,
        location: job.details.location,
        salary_min: salary.min,
        salary_max: salary.max,
        salary_currency: salary.currency,
        job_type: job.details.job_type,
        skills: job.skills.unwrap_or_default(),
        experience_years: None,
        company_website: None,
        company_industry: job.company.industry,
        posted_date,
        source: ProviderId::Provider1.as_str().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn response(jobs: Value) -> Provider1Response {
        serde_json::from_value(json!({
            "metadata": { "requestId": "test-123", "timestamp": "2025-08-11T08:00:00.000Z" },
            "jobs": jobs
        }))
        .unwrap()
    }

    #[test]
    fn test_transform_maps_all_fields() {
        let jobs = transform(response(json!([{
            "jobId": "P1-123",
            "title": "Software Engineer",
            "details": {
                "location": "San Francisco, CA",
                "type": "Full-Time",
                "salaryRange": "$100k - $150k"
            },
            "company": { "name": "TechCorp", "industry": "Technology" },
            "skills": ["JavaScript", "React", "Node.js"],
            "postedDate": "2025-08-01T10:00:00.000Z"
        }])));

        assert_eq!(jobs.len(), 1);
        assert_eq!(
            jobs[0],
            UnifiedJob {
                external_id: "P1-123".to_string(),
                title: "Software Engineer".to_string(),
                company: "TechCorp".to_string(),
                location: "San Francisco, CA".to_string(),
                salary_min: Some(100_000),
                salary_max: Some(150_000),
                salary_currency: "USD".to_string(),
                job_type: Some("Full-Time".to_string()),
                skills: vec![
                    "JavaScript".to_string(),
                    "React".to_string(),
                    "Node.js".to_string()
                ],
                is_remote: false,
                experience_years: None,
                company_website: None,
                company_industry: Some("Technology".to_string()),
                posted_date: Utc.with_ymd_and_hms(2025, 8, 1, 10, 0, 0).unwrap(),
                source: "provider1".to_string(),
            }
        );
    }

    #[test]
    fn test_transform_detects_remote_location() {
        let jobs = transform(response(json!([{
            "jobId": "P1-remote",
            "title": "Remote Developer",
            "details": {
                "location": "Remote, Anywhere",
                "type": "Full-Time",
                "salaryRange": "$80k - $120k"
            },
            "company": { "name": "RemoteCorp", "industry": "Tech" },
            "skills": ["Python"],
            "postedDate": "2025-08-01T10:00:00.000Z"
        }])));

        assert!(jobs[0].is_remote);
    }

    #[test]
    fn test_transform_defaults_missing_fields() {
        let jobs = transform(response(json!([{
            "jobId": "P1-sparse",
            "title": "Analyst",
            "details": { "location": "Austin, TX", "salaryRange": "Competitive" },
            "company": { "name": "DataCorp" },
            "skills": null,
            "postedDate": "2025-08-01T10:00:00Z"
        }])));

        assert_eq!(jobs.len(), 1);
        let job = &jobs[0];
        assert_eq!(job.salary_min, None);
        assert_eq!(job.salary_max, None);
        assert_eq!(job.salary_currency, "USD");
        assert_eq!(job.job_type, None);
        assert_eq!(job.company_industry, None);
        assert!(job.skills.is_empty());
        assert!(!job.is_remote);
    }

    #[test]
    fn test_transform_treats_explicit_nulls_as_missing() {
        let jobs = transform(response(json!([
            {
                "jobId": "P1-nulls",
                "title": null,
                "details": { "location": null, "type": null, "salaryRange": null },
                "company": { "name": null, "industry": null },
                "postedDate": "2025-08-01T10:00:00Z"
            },
            {
                "jobId": "P1-null-objects",
                "title": "Analyst",
                "details": null,
                "company": null,
                "postedDate": "2025-08-01T10:00:00Z"
            }
        ])));

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].external_id, "P1-nulls");
        assert_eq!(jobs[0].title, "");
        assert_eq!(jobs[0].location, "");
        assert_eq!(jobs[0].company, "");
        assert_eq!(jobs[0].salary_min, None);
        assert_eq!(jobs[1].external_id, "P1-null-objects");
        assert_eq!(jobs[1].title, "Analyst");
        assert!(!jobs[1].is_remote);
    }

    #[test]
    fn test_transform_skips_bad_records_but_keeps_siblings() {
        let jobs = transform(response(json!([
            { "title": "No id", "postedDate": "2025-08-01T10:00:00Z" },
            {
                "jobId": "P1-bad-date",
                "title": "Bad date",
                "details": { "location": "Boston, MA" },
                "company": { "name": "Acme" },
                "postedDate": "not a date"
            },
            {
                "jobId": "P1-good",
                "title": "Good",
                "details": { "location": "Boston, MA" },
                "company": { "name": "Acme" },
                "postedDate": "2025-08-01T10:00:00Z"
            }
        ])));

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].external_id, "P1-good");
    }
}
