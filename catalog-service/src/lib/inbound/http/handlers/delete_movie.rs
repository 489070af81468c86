use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::movie::models::MovieId;
use crate::domain::permission::models::MoviesWrite;
use crate::inbound::http::extractors::RequirePermission;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::IdParam;
use crate::inbound::http::handlers::MessageResponseData;
use crate::inbound::http::router::AppState;

pub async fn delete_movie(
    _: RequirePermission<MoviesWrite>,
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    state.movie_service.delete(MovieId(id)).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageResponseData::new("movie successfully deleted"),
    ))
}
