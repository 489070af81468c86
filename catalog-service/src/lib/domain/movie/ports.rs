use async_trait::async_trait;

use crate::domain::movie::errors::MovieError;
use crate::domain::movie::models::Movie;
use crate::domain::movie::models::MovieFilter;
use crate::domain::movie::models::MovieId;
use crate::domain::movie::models::MoviePage;
use crate::domain::movie::models::NewMovie;
use crate::domain::movie::models::UpdateMovieCommand;

/// Catalog operations exposed to the inbound adapters.
#[async_trait]
pub trait MovieServicePort: Send + Sync + 'static {
    async fn create(&self, movie: NewMovie) -> Result<Movie, MovieError>;

    /// # Errors
    /// * `NotFound` - No movie with this id, or id below 1
    async fn get(&self, id: MovieId) -> Result<Movie, MovieError>;

    async fn list(&self, filter: MovieFilter) -> Result<MoviePage, MovieError>;

    /// Read, merge and commit behind the version fence.
    ///
    /// # Arguments
    /// * `id` - Movie to change
    /// * `command` - Fields to replace and the version the client last saw
    ///
    /// # Returns
    /// The movie as stored, carrying its incremented version
    ///
    /// # Errors
    /// * `NotFound` - No movie with this id, or id below 1
    /// * `EditConflict` - Version moved between read and commit, the row was
    ///   deleted in between, or `expected_version` is stale
    async fn update(&self, id: MovieId, command: UpdateMovieCommand) -> Result<Movie, MovieError>;

    /// # Errors
    /// * `NotFound` - No movie with this id, or id below 1
    async fn delete(&self, id: MovieId) -> Result<(), MovieError>;
}

/// Persistence operations for movies.
#[async_trait]
pub trait MovieRepository: Send + Sync + 'static {
    async fn insert(&self, movie: NewMovie) -> Result<Movie, MovieError>;

    async fn get(&self, id: MovieId) -> Result<Option<Movie>, MovieError>;

    /// Returns the requested page and the total number of matching records.
    async fn list(&self, filter: &MovieFilter) -> Result<(Vec<Movie>, u64), MovieError>;

    /// Single conditional write on `(id, version)`.
    ///
    /// # Returns
    /// The new version, exactly one above `movie.version`
    ///
    /// # Errors
    /// * `EditConflict` - No row matched `(id, version)`
    async fn update(&self, movie: &Movie) -> Result<i32, MovieError>;

    /// # Errors
    /// * `NotFound` - No row was deleted
    async fn delete(&self, id: MovieId) -> Result<(), MovieError>;
}
