use std::sync::Arc;

use async_trait::async_trait;
use auth::OpaqueToken;
use auth::TokenScope;
use chrono::Duration;
use chrono::Utc;

use crate::domain::token::errors::TokenServiceError;
use crate::domain::token::models::IssuedToken;
use crate::domain::token::models::TokenRecord;
use crate::domain::token::ports::TokenRepository;
use crate::domain::token::ports::TokenServicePort;
use crate::domain::user::models::UserId;

/// Token issuer.
///
/// Generates opaque tokens, persists only their digest, and hands the
/// plaintext back to the caller exactly once.
pub struct TokenService<TR>
where
    TR: TokenRepository,
{
    repository: Arc<TR>,
}

impl<TR> TokenService<TR>
where
    TR: TokenRepository,
{
    pub fn new(repository: Arc<TR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<TR> TokenServicePort for TokenService<TR>
where
    TR: TokenRepository,
{
    async fn issue(
        &self,
        user_id: UserId,
        ttl: Duration,
        scope: TokenScope,
    ) -> Result<IssuedToken, TokenServiceError> {
        let token = OpaqueToken::generate()?;
        let expiry = Utc::now() + ttl;

        let record = TokenRecord {
            digest: token.digest(),
            user_id,
            expiry,
            scope,
        };
        self.repository.insert(&record).await?;

        tracing::debug!(user_id = %user_id, scope = %scope, expiry = %expiry, "Token issued");

        Ok(IssuedToken {
            token,
            user_id,
            expiry,
            scope,
        })
    }

    async fn delete_all_for_user(
        &self,
        scope: TokenScope,
        user_id: UserId,
    ) -> Result<(), TokenServiceError> {
        self.repository.delete_all_for_user(scope, user_id).await?;
        tracing::debug!(user_id = %user_id, scope = %scope, "Tokens invalidated");
        Ok(())
    }
}
