use async_trait::async_trait;
use auth::TokenScope;
use chrono::Duration;

use crate::domain::errors::StorageError;
use crate::domain::token::errors::TokenServiceError;
use crate::domain::token::models::IssuedToken;
use crate::domain::token::models::TokenRecord;
use crate::domain::user::models::UserId;

/// Port for token issuance.
#[async_trait]
pub trait TokenServicePort: Send + Sync + 'static {
    /// Issue a new token for a user.
    ///
    /// # Arguments
    /// * `user_id` - Owning user
    /// * `ttl` - Lifetime from now
    /// * `scope` - Purpose class the token is honoured for
    ///
    /// # Returns
    /// Issued token carrying the plaintext (shown once)
    ///
    /// # Errors
    /// * `Generation` - Random source failed
    /// * `Storage` - Token could not be persisted
    async fn issue(
        &self,
        user_id: UserId,
        ttl: Duration,
        scope: TokenScope,
    ) -> Result<IssuedToken, TokenServiceError>;

    /// Invalidate every outstanding token of `scope` held by `user_id`.
    ///
    /// # Errors
    /// * `Storage` - Deletion failed
    async fn delete_all_for_user(
        &self,
        scope: TokenScope,
        user_id: UserId,
    ) -> Result<(), TokenServiceError>;
}

/// Persistence operations for tokens.
#[async_trait]
pub trait TokenRepository: Send + Sync + 'static {
    /// Persist a token record.
    ///
    /// # Errors
    /// * `Timeout` / `Fault` - Database operation failed
    async fn insert(&self, record: &TokenRecord) -> Result<(), StorageError>;

    /// Remove every token of `scope` owned by `user_id`.
    ///
    /// # Errors
    /// * `Timeout` / `Fault` - Database operation failed
    async fn delete_all_for_user(
        &self,
        scope: TokenScope,
        user_id: UserId,
    ) -> Result<(), StorageError>;
}
