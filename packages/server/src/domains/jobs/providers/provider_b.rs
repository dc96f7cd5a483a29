//! Provider 2: records keyed by external id under `data.jobsList`, with
//! numeric compensation and an explicit remote flag.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::parsing::{null_as_default, parse_posted_date, round_to_i32, DEFAULT_CURRENCY};
use super::ProviderId;
use crate::domains::jobs::models::UnifiedJob;

#[derive(Debug, Clone, Deserialize)]
pub struct Provider2Response {
    #[serde(default)]
    pub status: Option<String>,
    pub data: Provider2Data,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider2Data {
    pub jobs_list: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider2Job {
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: Provider2Location,
    #[serde(default, deserialize_with = "null_as_default")]
    pub compensation: Provider2Compensation,
    #[serde(default, deserialize_with = "null_as_default")]
    pub employer: Provider2Employer,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requirements: Provider2Requirements,
    pub date_posted: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Provider2Location {
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub remote: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Provider2Compensation {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider2Employer {
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_name: String,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Provider2Requirements {
    pub experience: Option<f64>,
    pub technologies: Option<Vec<String>>,
}

pub fn transform(response: Provider2Response) -> Vec<UnifiedJob> {
    debug!(
        status = ?response.status,
        records = response.data.jobs_list.len(),
        "Normalizing Provider 2 payload"
    );

    response
        .data
        .jobs_list
        .into_iter()
        .filter_map(|(external_id, record)| {
            match serde_json::from_value::<Provider2Job>(record) {
                Ok(job) => normalize(external_id, job),
                Err(e) => {
                    warn!(
                        provider = %ProviderId::Provider2,
                        external_id = %external_id,
                        error = %e,
                        "Skipping malformed job record"
                    );
                    None
                }
            }
        })
        .collect()
}

fn normalize(external_id: String, job: Provider2Job) -> Option<UnifiedJob> {
    let Some(posted_date) = parse_posted_date(&job.date_posted) else {
        warn!(
            provider = %ProviderId::Provider2,
            external_id = %external_id,
            date_posted = %job.date_posted,
            "Skipping job with unparsable posted date"
        );
        return None;
    };

    let location = join_location(job.location.city.as_deref(), job.location.state.as_deref());
    let experience_years = job
        .requirements
        .experience
        .filter(|years| *years >= 0.0)
        .and_then(round_to_i32);

    Some(UnifiedJob {
        external_id,
        title: job.position,
        company: job.employer.company_name,
        location,
        salary_min: job.compensation.min.and_then(round_to_i32),
        salary_max: job.compensation.max.and_then(round_to_i32),
        salary_currency: job
            .compensation
            .currency
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        job_type: None,
        skills: job.requirements.technologies.unwrap_or_default(),
        is_remote: job.location.remote,
        experience_years,
        company_website: job.employer.website,
        company_industry: None,
        posted_date,
        source: ProviderId::Provider2.as_str().to_string(),
    })
}

/// "Austin" + "TX" -> "Austin, TX". Missing parts are left out.
fn join_location(city: Option<&str>, state: Option<&str>) -> String {
    [city, state]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
