//! Router assembly

use crate::handlers;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Uploads above this size are rejected before parsing
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/process-image", post(handlers::process_image))
        .route("/status/{task_id}", get(handlers::job_status))
        .route("/result/{task_id}", get(handlers::job_result))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
