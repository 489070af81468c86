use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::access::errors::AccessError;
use crate::domain::access::models::Identity;
use crate::domain::access::ports::AuthorizerPort;
use crate::domain::permission::ports::PermissionRepository;
use crate::domain::user::models::User;

/// Permission gate backed by the grant store.
pub struct Authorizer<PR>
where
    PR: PermissionRepository,
{
    permissions: Arc<PR>,
}

impl<PR> Authorizer<PR>
where
    PR: PermissionRepository,
{
    pub fn new(permissions: Arc<PR>) -> Self {
        Self { permissions }
    }
}

#[async_trait]
impl<PR> AuthorizerPort for Authorizer<PR>
where
    PR: PermissionRepository,
{
    async fn require_permission(
        &self,
        code: &str,
        identity: &Identity,
    ) -> Result<User, AccessError> {
        let user = identity.user().ok_or(AccessError::Unauthenticated)?;
        if !user.activated {
            return Err(AccessError::AccountNotActivated);
        }

        let granted = self.permissions.get_all_for_user(user.id).await?;
        if !granted.includes(code) {
            tracing::debug!(user_id = %user.id, permission = code, "Permission denied");
            return Err(AccessError::Forbidden);
        }

        Ok(user.clone())
    }
}
