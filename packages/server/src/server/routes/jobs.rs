//! `/api/job-offers` handlers.

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use crate::common::Paginated;
use crate::domains::jobs::actions::{self, JobSearchParams, JobStatsView};
use crate::domains::jobs::activities::IngestionSummary;
use crate::domains::jobs::models::Job;
use crate::domains::jobs::scheduler::SchedulerStatus;
use crate::domains::jobs::JobsError;
use crate::server::app::AppState;

/// Maps domain errors onto HTTP statuses.
pub struct ApiError(JobsError);

impl From<JobsError> for ApiError {
    fn from(e: JobsError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            JobsError::SchedulerBusy => (StatusCode::CONFLICT, self.0.to_string()),
            e if e.is_invalid_query() => (StatusCode::BAD_REQUEST, e.to_string()),
            e => {
                tracing::error!(error = %e, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = json!({
            "statusCode": status.as_u16(),
            "message": message,
            "error": status.canonical_reason().unwrap_or("Error"),
        });

        (status, Json(body)).into_response()
    }
}

pub async fn list_jobs_handler(
    Extension(state): Extension<AppState>,
    params: Result<Query<JobSearchParams>, QueryRejection>,
) -> Result<Json<Paginated<Job>>, ApiError> {
    let Query(params) = params.map_err(|e| JobsError::InvalidFilter(e.body_text()))?;
    let page = actions::find_jobs(params, &state.pagination, &state.db_pool).await?;
    Ok(Json(page))
}

pub async fn job_stats_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<JobStatsView>, ApiError> {
    let stats = actions::get_stats(&state.db_pool).await?;
    Ok(Json(stats))
}

#[derive(Serialize)]
pub struct FetchResponse {
    message: String,
    result: IngestionSummary,
    timestamp: DateTime<Utc>,
}

pub async fn trigger_fetch_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<FetchResponse>, ApiError> {
    let result = state.scheduler.trigger_fetch().await?;
    Ok(Json(FetchResponse {
        message: "Job fetch completed successfully".to_string(),
        result,
        timestamp: Utc::now(),
    }))
}

pub async fn scheduler_status_handler(
    Extension(state): Extension<AppState>,
) -> Json<SchedulerStatus> {
    Json(state.scheduler.status())
}
