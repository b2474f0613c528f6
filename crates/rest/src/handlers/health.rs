//! Health check endpoint handlers.
//!
//! Provides health, liveness and readiness endpoints for monitoring and
//! load balancers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use folio_persistence::core::DocumentStore;
use tracing::{debug, warn};

use crate::error::{RestError, RestResult};
use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET /health`
///
/// # Response
///
/// - `200 OK` - `{"status": "healthy", "backend": "...", "timestamp": "..."}`
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> RestResult<Response>
where
    S: DocumentStore + ?Sized,
{
    debug!("Processing health check request");

    let health_response = serde_json::json!({
        "status": "healthy",
        "backend": state.backend().kind().to_string(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    Ok((StatusCode::OK, Json(health_response)).into_response())
}

/// Handler for the liveness probe.
///
/// # HTTP Request
///
/// `GET /_liveness`
pub async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Handler for the readiness probe.
///
/// Asks the backend for a health check; answers 503 when it fails.
///
/// # HTTP Request
///
/// `GET /_readiness`
pub async fn readiness_handler<S>(State(state): State<AppState<S>>) -> RestResult<Response>
where
    S: DocumentStore + ?Sized,
{
    debug!("Processing readiness check request");

    let backend = state.backend();
    if let Err(e) = backend.health_check().await {
        warn!(backend = %backend.kind(), error = %e, "Readiness check failed");
        return Err(RestError::ServiceUnavailable {
            message: e.to_string(),
        });
    }

    let response = serde_json::json!({
        "status": "ready",
        "backend": backend.kind().to_string(),
        "checks": {
            "storage": "ok"
        }
    });

    Ok((StatusCode::OK, Json(response)).into_response())
}
