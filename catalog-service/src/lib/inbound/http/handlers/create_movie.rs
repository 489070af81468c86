use axum::extract::State;
use axum::http::header;
use axum::http::HeaderName;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::domain::movie::errors::MovieError;
use crate::domain::movie::models::Genres;
use crate::domain::movie::models::NewMovie;
use crate::domain::movie::models::Runtime;
use crate::domain::movie::models::Title;
use crate::domain::movie::models::Year;
use crate::domain::permission::models::MoviesWrite;
use crate::inbound::http::extractors::RequirePermission;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::JsonBody;
use crate::inbound::http::handlers::MovieResponseData;
use crate::inbound::http::router::AppState;

pub async fn create_movie(
    _: RequirePermission<MoviesWrite>,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateMovieRequest>,
) -> Result<([(HeaderName, String); 1], ApiSuccess<MovieResponseData>), ApiError> {
    let movie = state.movie_service.create(body.try_into_new_movie()?).await?;

    Ok((
        [(header::LOCATION, format!("/v1/movies/{}", movie.id))],
        ApiSuccess::new(StatusCode::CREATED, (&movie).into()),
    ))
}

/// HTTP request body for creating a movie (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMovieRequest {
    title: String,
    year: i32,
    runtime: String,
    genres: Vec<String>,
}

impl CreateMovieRequest {
    fn try_into_new_movie(self) -> Result<NewMovie, MovieError> {
        Ok(NewMovie {
            title: Title::new(self.title)?,
            year: Year::new(self.year)?,
            runtime: self.runtime.parse::<Runtime>()?,
            genres: Genres::new(self.genres)?,
        })
    }
}
