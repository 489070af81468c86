use axum::extract::State;
use axum::http::header;
use axum::http::HeaderName;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Prometheus text exposition of the HTTP counters.
pub async fn debug_vars(
    State(state): State<AppState>,
) -> Result<([(HeaderName, &'static str); 1], String), ApiError> {
    let body = state
        .metrics
        .render()
        .map_err(|e| ApiError::InternalServerError(format!("metrics encoding failed: {}", e)))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
