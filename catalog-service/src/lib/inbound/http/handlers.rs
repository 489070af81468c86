use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::PathRejection;
use axum::extract::rejection::QueryRejection;
use axum::extract::FromRequest;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::access::errors::AccessError;
use crate::domain::movie::errors::MovieError;
use crate::domain::movie::models::Movie;
use crate::domain::movie::models::Runtime;
use crate::domain::notification::models::Email;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::User;
use crate::inbound::http::router::AppState;

pub mod activate_user;
pub mod create_activation_token;
pub mod create_authentication_token;
pub mod create_movie;
pub mod create_password_reset_token;
pub mod debug_vars;
pub mod delete_movie;
pub mod get_movie;
pub mod healthcheck;
pub mod list_movies;
pub mod register_user;
pub mod update_movie;
pub mod update_password;

/// Message returned for every server-side fault.
pub const SERVER_ERROR_MESSAGE: &str =
    "the server encountered a problem and could not process your request";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }

    pub fn status(&self) -> StatusCode {
        self.0
    }

    pub fn data(&self) -> &T {
        &self.1 .0.data
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Carries the internal cause; only logged, never sent.
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
    MethodNotAllowed(String),
    TooManyRequests { retry_after_secs: u64 },
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(cause) => {
                tracing::error!(error = %cause, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    SERVER_ERROR_MESSAGE.to_string(),
                )
            }
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => {
                let mut response = (
                    StatusCode::UNAUTHORIZED,
                    Json(ApiResponseBody::new_error(StatusCode::UNAUTHORIZED, msg)),
                )
                    .into_response();
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                return response;
            }
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::MethodNotAllowed(msg) => (StatusCode::METHOD_NOT_ALLOWED, msg),
            ApiError::TooManyRequests { retry_after_secs } => {
                let status = StatusCode::TOO_MANY_REQUESTS;
                let mut response = (
                    status,
                    Json(ApiResponseBody::new_error(
                        status,
                        "rate limit exceeded".to_string(),
                    )),
                )
                    .into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
                return response;
            }
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidName(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidPassword(_)
            | UserError::DuplicateEmail
            | UserError::EmailNotFound
            | UserError::InvalidToken(_)
            | UserError::AlreadyActivated
            | UserError::NotActivated => ApiError::UnprocessableEntity(err.to_string()),
            UserError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            UserError::EditConflict => ApiError::Conflict(err.to_string()),
            UserError::Password(_) | UserError::Token(_) | UserError::Storage(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<MovieError> for ApiError {
    fn from(err: MovieError) -> Self {
        match err {
            MovieError::InvalidTitle(_)
            | MovieError::InvalidYear(_)
            | MovieError::InvalidRuntime(_)
            | MovieError::InvalidGenres(_)
            | MovieError::InvalidFilter(_) => ApiError::UnprocessableEntity(err.to_string()),
            MovieError::NotFound => ApiError::NotFound(err.to_string()),
            MovieError::EditConflict => ApiError::Conflict(err.to_string()),
            MovieError::Storage(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::InvalidCredentialFormat
            | AccessError::InvalidOrExpiredCredential
            | AccessError::Unauthenticated => ApiError::Unauthorized(err.to_string()),
            AccessError::AccountNotActivated | AccessError::Forbidden => {
                ApiError::Forbidden(err.to_string())
            }
            AccessError::Storage(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        ApiError::NotFound("the requested resource could not be found".to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::UnprocessableEntity(rejection.body_text())
    }
}

/// JSON request body whose rejections use the error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Numeric `:id` path segment; anything else is a 404.
#[derive(Debug, Deserialize, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct IdParam(pub i64);

/// Query string whose rejections use the error envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// Hand an email to the mailer without holding up the response.
///
/// The send is registered with the shutdown coordinator so a drain waits
/// for it.
pub(crate) fn send_in_background(state: &AppState, task: &'static str, email: Email) {
    let mailer = state.mailer.clone();
    let accepted = state.coordinator.spawn_background(task, async move {
        let recipient = email.recipient.clone();
        if let Err(e) = mailer.send(email).await {
            tracing::error!(task, recipient = %recipient, error = %e, "Failed to send email");
        }
    });

    if !accepted {
        tracing::warn!(task, "Email dropped, server is stopped");
    }
}

/// Public view of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponseData {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub activated: bool,
}

impl From<&User> for UserResponseData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            created_at: user.created_at,
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            activated: user.activated,
        }
    }
}

/// Public view of a movie
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieResponseData {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub runtime: Runtime,
    pub genres: Vec<String>,
    pub version: i32,
}

impl From<&Movie> for MovieResponseData {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id.0,
            title: movie.title.as_str().to_string(),
            year: movie.year.value(),
            runtime: movie.runtime,
            genres: movie.genres.as_slice().to_vec(),
            version: movie.version,
        }
    }
}

/// Plain acknowledgement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponseData {
    pub message: String,
}

impl MessageResponseData {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}
