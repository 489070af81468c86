use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::Password;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::JsonBody;
use crate::inbound::http::handlers::MessageResponseData;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdatePasswordRequest {
    password: String,
    token: String,
}

/// Set a new password using a password-reset token.
pub async fn update_password(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<UpdatePasswordRequest>,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    let password = Password::new(body.password).map_err(UserError::from)?;

    state
        .user_service
        .reset_password(&body.token, password)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageResponseData::new("your password was successfully reset"),
    ))
}
