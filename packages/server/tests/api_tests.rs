//! Router-level tests for the `/api/job-offers` surface.

mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use crate::common::{provider1_payload, provider2_payload, provider_config, TestHarness};
use jobs_core::config::{PaginationConfig, SchedulerConfig};
use jobs_core::domains::jobs::providers::ProviderId;
use jobs_core::domains::jobs::scheduler::IngestionScheduler;
use jobs_core::kernel::{MockJobFetcher, TestDependencies};
use jobs_core::server::{build_app, AppState};
use serde_json::Value;
use test_context::test_context;
use tower::ServiceExt;

fn app(ctx: &TestHarness) -> Router {
    let fetcher = MockJobFetcher::new()
        .with_payload(ProviderId::Provider1, provider1_payload(3))
        .with_payload(ProviderId::Provider2, provider2_payload(2));
    let ingestor = TestDependencies::new().mock_fetcher(fetcher).into_ingestor(
        ctx.db_pool.clone(),
        vec![
            provider_config(ProviderId::Provider1, "http://provider1.test/jobs", 1),
            provider_config(ProviderId::Provider2, "http://provider2.test/jobs", 1),
        ],
    );
    let scheduler = Arc::new(IngestionScheduler::new(
        Arc::new(ingestor),
        SchedulerConfig::default(),
    ));

    build_app(AppState {
        db_pool: ctx.db_pool.clone(),
        scheduler,
        pagination: PaginationConfig::default(),
    })
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[test_context(TestHarness)]
#[tokio::test]
async fn fetch_then_list_and_stats(ctx: &TestHarness) {
    let app = app(ctx);

    let (status, body) = send(&app, "POST", "/api/job-offers/fetch").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Job fetch completed successfully");
    assert_eq!(body["result"]["totalFetched"], 5);
    assert_eq!(body["result"]["totalStored"], 5);
    assert!(body["timestamp"].is_string());

    let (status, body) = send(&app, "GET", "/api/job-offers?limit=2&sortBy=title&sortOrder=asc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["title"], "Backend Engineer 0");
    assert_eq!(body["pagination"]["total"], 5);
    assert_eq!(body["pagination"]["totalPages"], 3);
    assert_eq!(body["pagination"]["hasNext"], true);
    assert_eq!(body["pagination"]["hasPrev"], false);

    let (status, body) = send(&app, "GET", "/api/job-offers/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 5);
    assert_eq!(body["bySource"].as_array().unwrap().len(), 2);
    assert!(body["lastUpdated"].is_string());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn invalid_query_input_is_bad_request(ctx: &TestHarness) {
    let app = app(ctx);

    let (status, body) = send(&app, "GET", "/api/job-offers?sortBy=bogus").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusCode"], 400);

    let (status, _) = send(&app, "GET", "/api/job-offers?limit=500").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/job-offers?minSalary=-10").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/api/job-offers?minSalary=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusCode"], 400);
    assert_eq!(body["error"], "Bad Request");

    let (status, body) = send(&app, "GET", "/api/job-offers?remote=maybe").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusCode"], 400);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn empty_query_values_are_ignored(ctx: &TestHarness) {
    let app = app(ctx);

    let (status, body) = send(
        &app,
        "GET",
        "/api/job-offers?minSalary=&maxSalary=&remote=&page=&limit=",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 10);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn scheduler_status_and_health(ctx: &TestHarness) {
    let app = app(ctx);

    let (status, body) = send(&app, "GET", "/api/job-offers/scheduler/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isRunning"], false);
    assert_eq!(body["enabled"], true);
    assert_eq!(body["cronExpression"], "0 */6 * * *");

    let (status, body) = send(&app, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["status"], "ok");
}
