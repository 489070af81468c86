use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::notification::models::Email;
use crate::domain::user::errors::EmailError;
use crate::domain::user::errors::PasswordRuleError;
use crate::domain::user::errors::UserNameError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UserName;
use crate::inbound::http::handlers::send_in_background;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::JsonBody;
use crate::inbound::http::handlers::UserResponseData;
use crate::inbound::http::router::AppState;

/// Register an unactivated user and mail them an activation token.
pub async fn register_user(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterUserRequest>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let registered = state
        .user_service
        .register(body.try_into_command()?)
        .await?;

    send_in_background(
        &state,
        "welcome_email",
        Email::welcome(&registered.user, &registered.token),
    );

    Ok(ApiSuccess::new(
        StatusCode::ACCEPTED,
        (&registered.user).into(),
    ))
}

/// HTTP request body for registering a user (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterUserRequest {
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterUserRequestError {
    #[error("name {0}")]
    Name(#[from] UserNameError),

    #[error("email {0}")]
    Email(#[from] EmailError),

    #[error("password {0}")]
    Password(#[from] PasswordRuleError),
}

impl RegisterUserRequest {
    fn try_into_command(self) -> Result<RegisterUserCommand, ParseRegisterUserRequestError> {
        let name = UserName::new(self.name)?;
        let email = EmailAddress::new(self.email)?;
        let password = Password::new(self.password)?;
        Ok(RegisterUserCommand::new(name, email, password))
    }
}

impl From<ParseRegisterUserRequestError> for ApiError {
    fn from(err: ParseRegisterUserRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
