use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::movie::errors::MovieError;
use crate::domain::movie::models::MovieFilter;
use crate::domain::movie::models::MoviePage;
use crate::domain::movie::models::PageMetadata;
use crate::domain::movie::models::Sort;
use crate::domain::permission::models::MoviesRead;
use crate::inbound::http::extractors::RequirePermission;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MovieResponseData;
use crate::inbound::http::handlers::QueryParams;
use crate::inbound::http::router::AppState;

/// Query string for listing movies.
///
/// `genres` is comma separated; `sort` is a column name, optionally
/// prefixed with `-` for descending order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMoviesParams {
    title: Option<String>,
    genres: Option<String>,
    page: Option<u32>,
    page_size: Option<u32>,
    sort: Option<String>,
}

impl ListMoviesParams {
    fn try_into_filter(self) -> Result<MovieFilter, MovieError> {
        let defaults = MovieFilter::default();

        let genres = self
            .genres
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|genre| !genre.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let sort = match self.sort {
            Some(raw) => raw.parse::<Sort>()?,
            None => defaults.sort,
        };

        Ok(MovieFilter::new(
            self.title,
            genres,
            self.page.unwrap_or(defaults.page),
            self.page_size.unwrap_or(defaults.page_size),
            sort,
        )?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListMoviesResponseData {
    pub movies: Vec<MovieResponseData>,
    pub metadata: PageMetadata,
}

impl From<&MoviePage> for ListMoviesResponseData {
    fn from(page: &MoviePage) -> Self {
        Self {
            movies: page.movies.iter().map(MovieResponseData::from).collect(),
            metadata: page.metadata.clone(),
        }
    }
}

pub async fn list_movies(
    _: RequirePermission<MoviesRead>,
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListMoviesParams>,
) -> Result<ApiSuccess<ListMoviesResponseData>, ApiError> {
    state
        .movie_service
        .list(params.try_into_filter()?)
        .await
        .map_err(ApiError::from)
        .map(|ref page| ApiSuccess::new(StatusCode::OK, page.into()))
}
