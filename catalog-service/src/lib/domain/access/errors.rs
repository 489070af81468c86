use thiserror::Error;

use crate::domain::errors::StorageError;

/// Failures while resolving or checking the requester's identity
#[derive(Debug, Clone, Error)]
pub enum AccessError {
    #[error("invalid or missing authentication token")]
    InvalidCredentialFormat,

    #[error("invalid or missing authentication token")]
    InvalidOrExpiredCredential,

    #[error("your user account must be activated to access this resource")]
    AccountNotActivated,

    #[error("you must be authenticated to access this resource")]
    Unauthenticated,

    #[error("your user account doesn't have the necessary permissions to access this resource")]
    Forbidden,

    #[error(transparent)]
    Storage(#[from] StorageError),
}
