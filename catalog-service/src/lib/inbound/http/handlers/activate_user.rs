use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::JsonBody;
use crate::inbound::http::handlers::UserResponseData;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActivateUserRequest {
    token: String,
}

pub async fn activate_user(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ActivateUserRequest>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    state
        .user_service
        .activate(&body.token)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
