use async_trait::async_trait;

use crate::domain::errors::StorageError;
use crate::domain::permission::models::Permissions;
use crate::domain::user::models::UserId;

/// Persistence operations for permission grants.
///
/// Codes themselves are seeded by migrations; this port only reads and
/// creates grants.
#[async_trait]
pub trait PermissionRepository: Send + Sync + 'static {
    /// Every permission code granted to a user.
    ///
    /// # Errors
    /// * `Timeout` / `Fault` - Database operation failed
    async fn get_all_for_user(&self, user_id: UserId) -> Result<Permissions, StorageError>;

    /// Grant codes to a user. Unknown codes are ignored.
    ///
    /// # Errors
    /// * `Timeout` / `Fault` - Database operation failed
    async fn add_for_user(
        &self,
        user_id: UserId,
        codes: &[&'static str],
    ) -> Result<(), StorageError>;
}
