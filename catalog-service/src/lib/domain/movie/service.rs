use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::movie::errors::MovieError;
use crate::domain::movie::models::Movie;
use crate::domain::movie::models::MovieFilter;
use crate::domain::movie::models::MovieId;
use crate::domain::movie::models::MoviePage;
use crate::domain::movie::models::NewMovie;
use crate::domain::movie::models::PageMetadata;
use crate::domain::movie::models::UpdateMovieCommand;
use crate::domain::movie::ports::MovieRepository;
use crate::domain::movie::ports::MovieServicePort;

/// Catalog service guarding writes with the record version.
pub struct MovieService<MR>
where
    MR: MovieRepository,
{
    repository: Arc<MR>,
}

impl<MR> MovieService<MR>
where
    MR: MovieRepository,
{
    pub fn new(repository: Arc<MR>) -> Self {
        Self { repository }
    }

    fn check_id(id: MovieId) -> Result<MovieId, MovieError> {
        if id.0 < 1 {
            return Err(MovieError::NotFound);
        }
        Ok(id)
    }
}

#[async_trait]
impl<MR> MovieServicePort for MovieService<MR>
where
    MR: MovieRepository,
{
    async fn create(&self, movie: NewMovie) -> Result<Movie, MovieError> {
        let movie = self.repository.insert(movie).await?;
        tracing::info!(movie_id = %movie.id, "Movie created");
        Ok(movie)
    }

    async fn get(&self, id: MovieId) -> Result<Movie, MovieError> {
        let id = Self::check_id(id)?;
        self.repository.get(id).await?.ok_or(MovieError::NotFound)
    }

    async fn list(&self, filter: MovieFilter) -> Result<MoviePage, MovieError> {
        let (movies, total) = self.repository.list(&filter).await?;
        Ok(MoviePage {
            movies,
            metadata: PageMetadata::new(total, filter.page, filter.page_size),
        })
    }

    async fn update(&self, id: MovieId, command: UpdateMovieCommand) -> Result<Movie, MovieError> {
        let id = Self::check_id(id)?;
        let current = self.repository.get(id).await?.ok_or(MovieError::NotFound)?;

        if let Some(expected) = command.expected_version {
            if expected != current.version {
                tracing::debug!(
                    movie_id = %id,
                    expected,
                    actual = current.version,
                    "Stale version submitted"
                );
                return Err(MovieError::EditConflict);
            }
        }

        let mut movie = command.apply_to(current);
        movie.version = self.repository.update(&movie).await?;

        tracing::info!(movie_id = %movie.id, version = movie.version, "Movie updated");

        Ok(movie)
    }

    async fn delete(&self, id: MovieId) -> Result<(), MovieError> {
        let id = Self::check_id(id)?;
        self.repository.delete(id).await?;
        tracing::info!(movie_id = %id, "Movie deleted");
        Ok(())
    }
}
