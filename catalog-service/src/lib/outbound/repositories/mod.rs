use std::future::Future;
use std::time::Duration;

use crate::domain::errors::StorageError;

pub mod movie;
pub mod permission;
pub mod token;
pub mod user;

pub use movie::PostgresMovieRepository;
pub use permission::PostgresPermissionRepository;
pub use token::PostgresTokenRepository;
pub use user::PostgresUserRepository;

/// Upper bound on every storage round trip.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Bound `query` by [`QUERY_TIMEOUT`], leaving driver errors to the caller.
pub(crate) async fn deadline<F, T>(
    operation: &'static str,
    query: F,
) -> Result<Result<T, sqlx::Error>, StorageError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    tokio::time::timeout(QUERY_TIMEOUT, query).await.map_err(|_| {
        tracing::warn!(operation, "Query deadline exceeded");
        StorageError::Timeout(operation)
    })
}

/// Bound `query` by [`QUERY_TIMEOUT`] and map driver errors to faults.
pub(crate) async fn run<F, T>(operation: &'static str, query: F) -> Result<T, StorageError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    deadline(operation, query).await?.map_err(|e| fault(operation, e))
}

pub(crate) fn fault(operation: &'static str, e: impl std::fmt::Display) -> StorageError {
    StorageError::Fault(format!("{}: {}", operation, e))
}
