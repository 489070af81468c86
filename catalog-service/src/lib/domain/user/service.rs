use std::sync::Arc;

use async_trait::async_trait;
use auth::HashedPassword;
use auth::OpaqueToken;
use auth::PasswordError;
use auth::PasswordHasher;
use auth::TokenScope;

use crate::domain::permission::models::MOVIES_READ;
use crate::domain::permission::ports::PermissionRepository;
use crate::domain::token::models::default_ttl;
use crate::domain::token::models::IssuedToken;
use crate::domain::token::ports::TokenServicePort;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserWithToken;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR, PR, TS>
where
    UR: UserRepository,
    PR: PermissionRepository,
    TS: TokenServicePort,
{
    repository: Arc<UR>,
    permissions: Arc<PR>,
    tokens: Arc<TS>,
    password_hasher: PasswordHasher,
}

impl<UR, PR, TS> UserService<UR, PR, TS>
where
    UR: UserRepository,
    PR: PermissionRepository,
    TS: TokenServicePort,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `permissions` - Permission grant persistence
    /// * `tokens` - Token issuer
    pub fn new(repository: Arc<UR>, permissions: Arc<PR>, tokens: Arc<TS>) -> Self {
        Self {
            repository,
            permissions,
            tokens,
            password_hasher: PasswordHasher::new(),
        }
    }

    /// Replace the default hashing work factor.
    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self
    }

    // Hashing is deliberately slow, keep it off the async workers.
    async fn hash_password(&self, password: Password) -> Result<HashedPassword, UserError> {
        let hasher = self.password_hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(password.as_str()))
            .await
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
            .map_err(UserError::from)
    }

    async fn verify_password(
        &self,
        password: &str,
        hash: &HashedPassword,
    ) -> Result<bool, UserError> {
        let hasher = self.password_hasher.clone();
        let password = password.to_string();
        let hash = hash.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
            .map_err(UserError::from)
    }

    async fn find_for_token(&self, scope: TokenScope, token: &str) -> Result<User, UserError> {
        let token = OpaqueToken::parse(token).map_err(|_| UserError::InvalidToken(scope))?;

        self.repository
            .find_for_token(scope, &token.digest())
            .await?
            .ok_or(UserError::InvalidToken(scope))
    }

    async fn issue(&self, user: &User, scope: TokenScope) -> Result<IssuedToken, UserError> {
        Ok(self.tokens.issue(user.id, default_ttl(scope), scope).await?)
    }

    /// Issue a fresh token, revoking every earlier one of the same scope.
    async fn reissue(&self, user: &User, scope: TokenScope) -> Result<IssuedToken, UserError> {
        self.tokens.delete_all_for_user(scope, user.id).await?;
        self.issue(user, scope).await
    }
}

#[async_trait]
impl<UR, PR, TS> UserServicePort for UserService<UR, PR, TS>
where
    UR: UserRepository,
    PR: PermissionRepository,
    TS: TokenServicePort,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<UserWithToken, UserError> {
        let password_hash = self.hash_password(command.password).await?;

        let user = self
            .repository
            .insert(NewUser {
                name: command.name,
                email: command.email,
                password_hash,
            })
            .await?;

        self.permissions
            .add_for_user(user.id, &[MOVIES_READ])
            .await?;

        let token = self.issue(&user, TokenScope::Activation).await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(UserWithToken { user, token })
    }

    async fn activate(&self, token: &str) -> Result<User, UserError> {
        let mut user = self.find_for_token(TokenScope::Activation, token).await?;

        user.activated = true;
        let user = self.repository.update(user).await?;

        self.tokens
            .delete_all_for_user(TokenScope::Activation, user.id)
            .await?;

        tracing::info!(user_id = %user.id, "User activated");

        Ok(user)
    }

    async fn reset_password(&self, token: &str, password: Password) -> Result<User, UserError> {
        let mut user = self.find_for_token(TokenScope::PasswordReset, token).await?;

        user.password_hash = self.hash_password(password).await?;
        let user = self.repository.update(user).await?;

        self.tokens
            .delete_all_for_user(TokenScope::PasswordReset, user.id)
            .await?;

        tracing::info!(user_id = %user.id, "Password reset");

        Ok(user)
    }

    async fn login(&self, email: &EmailAddress, password: &str) -> Result<IssuedToken, UserError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password_hash).await? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(UserError::InvalidCredentials);
        }

        self.issue(&user, TokenScope::Authentication).await
    }

    async fn request_activation(&self, email: &EmailAddress) -> Result<UserWithToken, UserError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or(UserError::EmailNotFound)?;

        if user.activated {
            return Err(UserError::AlreadyActivated);
        }

        let token = self.reissue(&user, TokenScope::Activation).await?;
        Ok(UserWithToken { user, token })
    }

    async fn request_password_reset(
        &self,
        email: &EmailAddress,
    ) -> Result<UserWithToken, UserError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or(UserError::EmailNotFound)?;

        if !user.activated {
            return Err(UserError::NotActivated);
        }

        let token = self.reissue(&user, TokenScope::PasswordReset).await?;
        Ok(UserWithToken { user, token })
    }
}
