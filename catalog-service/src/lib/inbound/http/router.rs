use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::activate_user::activate_user;
use super::handlers::create_activation_token::create_activation_token;
use super::handlers::create_authentication_token::create_authentication_token;
use super::handlers::create_movie::create_movie;
use super::handlers::create_password_reset_token::create_password_reset_token;
use super::handlers::debug_vars::debug_vars;
use super::handlers::delete_movie::delete_movie;
use super::handlers::get_movie::get_movie;
use super::handlers::healthcheck::healthcheck;
use super::handlers::list_movies::list_movies;
use super::handlers::register_user::register_user;
use super::handlers::update_movie::update_movie;
use super::handlers::update_password::update_password;
use super::handlers::ApiError;
use super::middleware::authenticate;
use super::metrics::HttpMetrics;
use super::middleware::rate_limit;
use super::middleware::record_metrics;
use super::rate_limit::RateLimiter;
use crate::domain::access::ports::AuthenticatorPort;
use crate::domain::access::ports::AuthorizerPort;
use crate::domain::movie::ports::MovieServicePort;
use crate::domain::notification::ports::Mailer;
use crate::domain::user::ports::UserServicePort;
use crate::lifecycle::ShutdownCoordinator;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub movie_service: Arc<dyn MovieServicePort>,
    pub authenticator: Arc<dyn AuthenticatorPort>,
    pub authorizer: Arc<dyn AuthorizerPort>,
    pub rate_limiter: Arc<RateLimiter>,
    pub metrics: Arc<HttpMetrics>,
    pub mailer: Arc<dyn Mailer>,
    pub coordinator: Arc<ShutdownCoordinator>,
    pub environment: String,
}

pub fn create_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .route("/v1/healthcheck", get(healthcheck))
        .route("/v1/movies", get(list_movies).post(create_movie))
        .route(
            "/v1/movies/:id",
            get(get_movie).patch(update_movie).delete(delete_movie),
        )
        .route("/v1/users", post(register_user))
        .route("/v1/users/activated", put(activate_user))
        .route("/v1/users/password", put(update_password))
        .route(
            "/v1/tokens/authentication",
            post(create_authentication_token),
        )
        .route("/v1/tokens/activation", post(create_activation_token))
        .route(
            "/v1/tokens/password-reset",
            post(create_password_reset_token),
        )
        .route("/debug/vars", get(debug_vars))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(trace_layer)
        .layer(middleware::from_fn_with_state(state.clone(), record_metrics))
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("the requested resource could not be found".to_string())
}

async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(format!(
        "the {} method is not supported for this resource",
        method
    ))
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    let mut response = ApiError::InternalServerError(format!("handler panicked: {}", detail))
        .into_response();
    response
        .headers_mut()
        .insert(header::CONNECTION, HeaderValue::from_static("close"));
    response
}
