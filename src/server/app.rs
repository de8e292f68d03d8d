use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use super::handlers::{dispatch_request, health, prometheus_metrics, stats, MAX_BODY_BYTES};
use super::AppState;

pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/metrics", get(prometheus_metrics))
        // Dispatch surface
        .route("/trigger", post(dispatch_request))
        .route("/webhook", post(dispatch_request))
        // Unmatched paths still flow through the dispatcher for a uniform 404
        .fallback(dispatch_request)
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        // Add state
        .with_state(state)
}
