use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::Row;

use super::fault;
use super::run;
use crate::domain::errors::StorageError;
use crate::domain::permission::models::Permissions;
use crate::domain::permission::ports::PermissionRepository;
use crate::domain::user::models::UserId;

pub struct PostgresPermissionRepository {
    pool: PgPool,
}

impl PostgresPermissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionRepository for PostgresPermissionRepository {
    async fn get_all_for_user(&self, user_id: UserId) -> Result<Permissions, StorageError> {
        let rows = run(
            "permissions.get_all_for_user",
            sqlx::query(
                r#"
                SELECT permissions.code
                FROM permissions
                INNER JOIN users_permissions ON users_permissions.permission_id = permissions.id
                WHERE users_permissions.user_id = $1
                "#,
            )
            .bind(user_id.0)
            .fetch_all(&self.pool),
        )
        .await?;

        let codes = rows
            .iter()
            .map(|row| row.try_get::<String, _>("code"))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| fault("permissions.get_all_for_user", e))?;

        Ok(Permissions::new(codes))
    }

    async fn add_for_user(
        &self,
        user_id: UserId,
        codes: &[&'static str],
    ) -> Result<(), StorageError> {
        let codes: Vec<String> = codes.iter().map(|code| code.to_string()).collect();

        run(
            "permissions.add_for_user",
            sqlx::query(
                r#"
                INSERT INTO users_permissions (user_id, permission_id)
                SELECT $1, permissions.id FROM permissions WHERE permissions.code = ANY($2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(user_id.0)
            .bind(codes)
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }
}
