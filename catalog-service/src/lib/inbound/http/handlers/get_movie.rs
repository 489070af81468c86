use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::movie::models::MovieId;
use crate::domain::permission::models::MoviesRead;
use crate::inbound::http::extractors::RequirePermission;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::IdParam;
use crate::inbound::http::handlers::MovieResponseData;
use crate::inbound::http::router::AppState;

pub async fn get_movie(
    _: RequirePermission<MoviesRead>,
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> Result<ApiSuccess<MovieResponseData>, ApiError> {
    state
        .movie_service
        .get(MovieId(id))
        .await
        .map_err(ApiError::from)
        .map(|ref movie| ApiSuccess::new(StatusCode::OK, movie.into()))
}
