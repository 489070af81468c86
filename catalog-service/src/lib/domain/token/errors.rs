use thiserror::Error;

use crate::domain::errors::StorageError;

/// Error for token issuance and invalidation
#[derive(Debug, Clone, Error)]
pub enum TokenServiceError {
    #[error("Token generation failed: {0}")]
    Generation(#[from] auth::TokenError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
