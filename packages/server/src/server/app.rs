//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::PaginationConfig;
use crate::domains::jobs::scheduler::IngestionScheduler;
use crate::server::routes::{
    health_handler, job_stats_handler, list_jobs_handler, scheduler_status_handler,
    trigger_fetch_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub scheduler: Arc<IngestionScheduler>,
    pub pagination: PaginationConfig,
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    // CORS configuration - allow any origin
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    let job_offers = Router::new()
        .route("/", get(list_jobs_handler))
        .route("/stats", get(job_stats_handler))
        .route("/fetch", post(trigger_fetch_handler))
        .route("/scheduler/status", get(scheduler_status_handler));

    Router::new()
        .nest("/api/job-offers", job_offers)
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
