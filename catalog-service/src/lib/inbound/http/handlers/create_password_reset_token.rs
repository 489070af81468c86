use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::domain::notification::models::Email;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::handlers::send_in_background;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::JsonBody;
use crate::inbound::http::handlers::MessageResponseData;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePasswordResetTokenRequest {
    email: String,
}

pub async fn create_password_reset_token(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreatePasswordResetTokenRequest>,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    let email = EmailAddress::new(body.email).map_err(UserError::from)?;

    let issued = state.user_service.request_password_reset(&email).await?;
    send_in_background(
        &state,
        "password_reset_email",
        Email::password_reset(&issued.user, &issued.token),
    );

    Ok(ApiSuccess::new(
        StatusCode::ACCEPTED,
        MessageResponseData::new(
            "an email will be sent to you containing password reset instructions",
        ),
    ))
}
