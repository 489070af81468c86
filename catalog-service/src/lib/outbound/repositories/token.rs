use async_trait::async_trait;
use auth::TokenScope;
use sqlx::PgPool;

use super::run;
use crate::domain::errors::StorageError;
use crate::domain::token::models::TokenRecord;
use crate::domain::token::ports::TokenRepository;
use crate::domain::user::models::UserId;

pub struct PostgresTokenRepository {
    pool: PgPool,
}

impl PostgresTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for PostgresTokenRepository {
    async fn insert(&self, token: &TokenRecord) -> Result<(), StorageError> {
        run(
            "tokens.insert",
            sqlx::query(
                r#"
                INSERT INTO tokens (hash, user_id, expiry, scope)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(&token.digest.as_bytes()[..])
            .bind(token.user_id.0)
            .bind(token.expiry)
            .bind(token.scope.as_str())
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn delete_all_for_user(
        &self,
        scope: TokenScope,
        user_id: UserId,
    ) -> Result<(), StorageError> {
        let result = run(
            "tokens.delete_all_for_user",
            sqlx::query(
                r#"
                DELETE FROM tokens
                WHERE scope = $1 AND user_id = $2
                "#,
            )
            .bind(scope.as_str())
            .bind(user_id.0)
            .execute(&self.pool),
        )
        .await?;

        tracing::debug!(
            user_id = %user_id,
            scope = %scope,
            deleted = result.rows_affected(),
            "Tokens deleted"
        );

        Ok(())
    }
}
