use async_trait::async_trait;
use auth::TokenDigest;
use auth::TokenScope;

use crate::domain::token::models::IssuedToken;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserWithToken;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new, unactivated user.
    ///
    /// Grants read access to the catalog and issues the first activation
    /// token. The caller is responsible for mailing it.
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `Password` / `Token` / `Storage` - Infrastructure failure
    async fn register(&self, command: RegisterUserCommand) -> Result<UserWithToken, UserError>;

    /// Exchange an activation token for an activated account.
    ///
    /// # Errors
    /// * `InvalidToken` - Token unknown, expired or of another scope
    /// * `EditConflict` - User changed concurrently
    async fn activate(&self, token: &str) -> Result<User, UserError>;

    /// Exchange a password-reset token for a new password.
    ///
    /// # Errors
    /// * `InvalidToken` - Token unknown, expired or of another scope
    /// * `EditConflict` - User changed concurrently
    async fn reset_password(&self, token: &str, password: Password) -> Result<User, UserError>;

    /// Verify email and password, then issue an authentication token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    async fn login(&self, email: &EmailAddress, password: &str) -> Result<IssuedToken, UserError>;

    /// Issue a new activation token for a not yet activated account.
    ///
    /// # Errors
    /// * `EmailNotFound` - No user with this email
    /// * `AlreadyActivated` - Nothing to activate
    async fn request_activation(&self, email: &EmailAddress) -> Result<UserWithToken, UserError>;

    /// Issue a password-reset token for an activated account.
    ///
    /// # Errors
    /// * `EmailNotFound` - No user with this email
    /// * `NotActivated` - Account must be activated first
    async fn request_password_reset(
        &self,
        email: &EmailAddress,
    ) -> Result<UserWithToken, UserError>;
}

/// Credential store: persistence operations for users.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Returns
    /// Stored user with id, creation time and version 1
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `Storage` - Database operation failed
    async fn insert(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Errors
    /// * `Storage` - Database operation failed
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Errors
    /// * `Storage` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Retrieve the owner of an unexpired token of the given scope.
    ///
    /// # Arguments
    /// * `scope` - Scope the token must have been issued for
    /// * `digest` - Digest of the presented plaintext
    ///
    /// # Errors
    /// * `Storage` - Database operation failed
    async fn find_for_token(
        &self,
        scope: TokenScope,
        digest: &TokenDigest,
    ) -> Result<Option<User>, UserError>;

    /// Replace a user record, fenced on `user.version`.
    ///
    /// # Returns
    /// Stored user with the incremented version
    ///
    /// # Errors
    /// * `EditConflict` - No row with this id and version
    /// * `DuplicateEmail` - New email already registered
    /// * `Storage` - Database operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;
}
