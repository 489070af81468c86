use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::token::models::IssuedToken;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::JsonBody;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateAuthenticationTokenRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticationTokenResponseData {
    pub token: String,
    pub expiry: DateTime<Utc>,
}

impl From<&IssuedToken> for AuthenticationTokenResponseData {
    fn from(token: &IssuedToken) -> Self {
        Self {
            token: token.plaintext().to_string(),
            expiry: token.expiry,
        }
    }
}

/// Exchange email and password for a 24 hour bearer token.
pub async fn create_authentication_token(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateAuthenticationTokenRequest>,
) -> Result<ApiSuccess<AuthenticationTokenResponseData>, ApiError> {
    let email = EmailAddress::new(body.email).map_err(UserError::from)?;
    // Rule check only; the hash comparison happens in the service.
    Password::new(body.password.clone()).map_err(UserError::from)?;

    state
        .user_service
        .login(&email, &body.password)
        .await
        .map_err(ApiError::from)
        .map(|ref token| ApiSuccess::new(StatusCode::CREATED, token.into()))
}
