use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::domain::movie::errors::MovieError;
use crate::domain::movie::models::Genres;
use crate::domain::movie::models::MovieId;
use crate::domain::movie::models::Runtime;
use crate::domain::movie::models::Title;
use crate::domain::movie::models::UpdateMovieCommand;
use crate::domain::movie::models::Year;
use crate::domain::permission::models::MoviesWrite;
use crate::inbound::http::extractors::RequirePermission;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::IdParam;
use crate::inbound::http::handlers::JsonBody;
use crate::inbound::http::handlers::MovieResponseData;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating a movie (raw JSON).
///
/// `version` is the version the client last read; when present the update
/// is refused unless it is still current.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMovieRequest {
    title: Option<String>,
    year: Option<i32>,
    runtime: Option<String>,
    genres: Option<Vec<String>>,
    version: Option<i32>,
}

impl UpdateMovieRequest {
    fn try_into_command(self) -> Result<UpdateMovieCommand, MovieError> {
        Ok(UpdateMovieCommand {
            title: self.title.map(Title::new).transpose()?,
            year: self.year.map(Year::new).transpose()?,
            runtime: self
                .runtime
                .map(|raw| raw.parse::<Runtime>())
                .transpose()?,
            genres: self.genres.map(Genres::new).transpose()?,
            expected_version: self.version,
        })
    }
}

pub async fn update_movie(
    _: RequirePermission<MoviesWrite>,
    State(state): State<AppState>,
    IdParam(id): IdParam,
    JsonBody(body): JsonBody<UpdateMovieRequest>,
) -> Result<ApiSuccess<MovieResponseData>, ApiError> {
    let command = body.try_into_command()?;

    state
        .movie_service
        .update(MovieId(id), command)
        .await
        .map_err(ApiError::from)
        .map(|ref movie| ApiSuccess::new(StatusCode::OK, movie.into()))
}
