use std::sync::Arc;

use async_trait::async_trait;
use auth::Credential;
use auth::TokenScope;

use crate::domain::access::errors::AccessError;
use crate::domain::access::models::Identity;
use crate::domain::access::ports::AuthenticatorPort;
use crate::domain::errors::StorageError;
use crate::domain::user::errors::UserError;
use crate::domain::user::ports::UserRepository;

/// Resolves bearer tokens against stored authentication-scope tokens.
pub struct Authenticator<UR>
where
    UR: UserRepository,
{
    users: Arc<UR>,
}

impl<UR> Authenticator<UR>
where
    UR: UserRepository,
{
    pub fn new(users: Arc<UR>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<UR> AuthenticatorPort for Authenticator<UR>
where
    UR: UserRepository,
{
    async fn authenticate(&self, credential: Credential) -> Result<Identity, AccessError> {
        let token = match credential {
            Credential::Anonymous => return Ok(Identity::Anonymous),
            Credential::Bearer(token) => token,
        };

        let user = self
            .users
            .find_for_token(TokenScope::Authentication, &token.digest())
            .await
            .map_err(|e| match e {
                UserError::Storage(e) => AccessError::Storage(e),
                other => AccessError::Storage(StorageError::Fault(other.to_string())),
            })?
            .ok_or(AccessError::InvalidOrExpiredCredential)?;

        if !user.activated {
            tracing::debug!(user_id = %user.id, "Authenticated user is not activated");
            return Err(AccessError::AccountNotActivated);
        }

        Ok(Identity::User(user))
    }
}
