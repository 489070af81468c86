use async_trait::async_trait;
use auth::Credential;

use crate::domain::access::errors::AccessError;
use crate::domain::access::models::Identity;
use crate::domain::user::models::User;

/// Resolves a request credential to an identity.
#[async_trait]
pub trait AuthenticatorPort: Send + Sync + 'static {
    /// Resolve the credential presented with a request.
    ///
    /// # Returns
    /// `Identity::Anonymous` when no credential was presented, otherwise the
    /// activated user the bearer token belongs to
    ///
    /// # Errors
    /// * `InvalidOrExpiredCredential` - Token unknown, expired, or of another scope
    /// * `AccountNotActivated` - Token is valid but the account is not activated
    /// * `Storage` - Lookup failed
    async fn authenticate(&self, credential: Credential) -> Result<Identity, AccessError>;
}

/// Checks an identity against a permission code.
#[async_trait]
pub trait AuthorizerPort: Send + Sync + 'static {
    /// Require `code` to be among the identity's current grants.
    ///
    /// Grants are read on every call, never cached.
    ///
    /// # Errors
    /// * `Unauthenticated` - Identity is anonymous
    /// * `Forbidden` - Code is not granted
    /// * `Storage` - Grant lookup failed
    async fn require_permission(
        &self,
        code: &str,
        identity: &Identity,
    ) -> Result<User, AccessError>;
}
