use std::net::SocketAddr;
use std::time::Instant;

use auth::Credential;
use axum::extract::ConnectInfo;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::access::errors::AccessError;
use crate::domain::access::models::Identity;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Counts every request and its final status, including rejected ones.
pub async fn record_metrics(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let started = Instant::now();
    state.metrics.request_started();

    let response = next.run(req).await;

    state
        .metrics
        .response_sent(response.status().as_u16(), started.elapsed());
    response
}

/// Sheds requests from clients that exhausted their bucket.
pub async fn rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if state.rate_limiter.enabled() {
        let client = client_key(&req);
        if !state.rate_limiter.allow(&client) {
            tracing::debug!(client = %client, "Rate limit exceeded");
            return ApiError::TooManyRequests {
                retry_after_secs: state.rate_limiter.retry_after(),
            }
            .into_response();
        }
    }

    next.run(req).await
}

fn client_key(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(address)| address.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Resolves the bearer credential and attaches the resulting [`Identity`]
/// to the request. Requests without a credential continue as anonymous.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let mut response = match resolve_identity(&state, req.headers()).await {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Authentication failed");
            ApiError::from(e).into_response()
        }
    };

    response
        .headers_mut()
        .append(header::VARY, HeaderValue::from_static("Authorization"));
    response
}

async fn resolve_identity(state: &AppState, headers: &HeaderMap) -> Result<Identity, AccessError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .map(|value| value.to_str())
        .transpose()
        .map_err(|_| AccessError::InvalidCredentialFormat)?;

    let credential =
        Credential::from_header(header).map_err(|_| AccessError::InvalidCredentialFormat)?;

    state.authenticator.authenticate(credential).await
}
