use std::collections::HashMap;

use axum::{
    extract::{Form, FromRequest, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::dispatch::{DispatcherStatsSnapshot, HttpContext, InvocationEnvelope, RequestContext};
use crate::metrics;
use crate::queue::QueueStats;

use super::AppState;

/// Largest request body the transport will buffer
pub(super) const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub dispatch: DispatcherStatsSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<QueueStats>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let queue = match &state.queue {
        Some(queue) => Some(queue.stats().await),
        None => None,
    };

    Json(StatsResponse {
        dispatch: state.dispatcher.stats(),
        queue,
    })
}

/// GET /metrics - Prometheus metrics endpoint
pub async fn prometheus_metrics() -> impl IntoResponse {
    match metrics::encode_metrics() {
        Ok(output) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            output,
        ),
        Err(error) => {
            tracing::error!(error = %error, "Failed to encode Prometheus metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain")],
                format!("Failed to encode metrics: {}", error),
            )
        }
    }
}

/// Funnel a raw HTTP request through the dispatcher. All routed paths and
/// the fallback use this handler so classification happens in one place.
pub async fn dispatch_request(State(state): State<AppState>, request: Request) -> Response {
    let envelope = match envelope_from_request(request).await {
        Ok(envelope) => envelope,
        Err(response) => return response,
    };

    state.dispatcher.dispatch(envelope).await.into_response()
}

/// Capture the request as an invocation envelope. The messaging provider
/// posts form-encoded callbacks; those are normalized to a JSON object so
/// the core sees one wire format.
async fn envelope_from_request(request: Request) -> Result<InvocationEnvelope, Response> {
    let path = request.uri().path().to_string();

    let headers: HashMap<String, String> = request
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.to_string(), v.to_string()))
        })
        .collect();

    let is_form = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

    let body = if is_form {
        let Form(fields) = Form::<HashMap<String, String>>::from_request(request, &())
            .await
            .map_err(|rejection| rejection.into_response())?;
        serde_json::to_string(&fields).map_err(|error| {
            tracing::error!(error = %error, "Failed to normalize form body");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })?
    } else {
        let bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES)
            .await
            .map_err(|error| {
                tracing::warn!(error = %error, "Failed to read request body");
                StatusCode::BAD_REQUEST.into_response()
            })?;
        String::from_utf8_lossy(&bytes).into_owned()
    };

    Ok(InvocationEnvelope {
        request_context: Some(RequestContext {
            http: Some(HttpContext { path: path.clone() }),
        }),
        raw_path: Some(path),
        headers,
        body: Some(body),
        ..Default::default()
    })
}
