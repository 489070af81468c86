use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::lifecycle::LifecycleState;

pub async fn healthcheck(State(state): State<AppState>) -> ApiSuccess<HealthcheckResponseData> {
    let status = match state.coordinator.state() {
        LifecycleState::Running => "available",
        LifecycleState::Draining | LifecycleState::Stopped => "draining",
    };

    ApiSuccess::new(
        StatusCode::OK,
        HealthcheckResponseData {
            status: status.to_string(),
            system_info: SystemInfo {
                environment: state.environment.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthcheckResponseData {
    pub status: String,
    pub system_info: SystemInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    pub environment: String,
    pub version: String,
}
