use async_trait::async_trait;
use auth::HashedPassword;
use auth::TokenDigest;
use auth::TokenScope;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use super::deadline;
use super::fault;
use super::run;
use crate::domain::errors::StorageError;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserName;
use crate::domain::user::ports::UserRepository;

const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_duplicate_email(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db_err| {
            db_err.is_unique_violation() && db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT)
        })
        .unwrap_or(false)
}

fn user_from_row(row: &PgRow) -> Result<User, StorageError> {
    let read = |e: sqlx::Error| fault("users.decode", e);

    Ok(User {
        id: UserId(row.try_get("id").map_err(read)?),
        created_at: row.try_get("created_at").map_err(read)?,
        name: UserName::new(row.try_get("name").map_err(read)?)
            .map_err(|e| fault("users.decode", e))?,
        email: EmailAddress::new(row.try_get("email").map_err(read)?)
            .map_err(|e| fault("users.decode", e))?,
        password_hash: HashedPassword::from_stored(row.try_get("password_hash").map_err(read)?)
            .map_err(|e| fault("users.decode", e))?,
        activated: row.try_get("activated").map_err(read)?,
        version: row.try_get("version").map_err(read)?,
    })
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, UserError> {
        let row = deadline(
            "users.insert",
            sqlx::query(
                r#"
                INSERT INTO users (name, email, password_hash, activated)
                VALUES ($1, $2, $3, FALSE)
                RETURNING id, created_at, version
                "#,
            )
            .bind(user.name.as_str())
            .bind(user.email.as_str())
            .bind(user.password_hash.as_str())
            .fetch_one(&self.pool),
        )
        .await?
        .map_err(|e| {
            if is_duplicate_email(&e) {
                return UserError::DuplicateEmail;
            }
            UserError::Storage(fault("users.insert", e))
        })?;

        let read = |e: sqlx::Error| UserError::Storage(fault("users.insert", e));

        Ok(User {
            id: UserId(row.try_get("id").map_err(read)?),
            created_at: row.try_get("created_at").map_err(read)?,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            activated: false,
            version: row.try_get("version").map_err(read)?,
        })
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError> {
        let row = run(
            "users.find_by_id",
            sqlx::query(
                r#"
                SELECT id, created_at, name, email, password_hash, activated, version
                FROM users
                WHERE id = $1
                "#,
            )
            .bind(id.0)
            .fetch_optional(&self.pool),
        )
        .await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let row = run(
            "users.find_by_email",
            sqlx::query(
                r#"
                SELECT id, created_at, name, email, password_hash, activated, version
                FROM users
                WHERE email = $1
                "#,
            )
            .bind(email.as_str())
            .fetch_optional(&self.pool),
        )
        .await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn find_for_token(
        &self,
        scope: TokenScope,
        digest: &TokenDigest,
    ) -> Result<Option<User>, UserError> {
        let row = run(
            "users.find_for_token",
            sqlx::query(
                r#"
                SELECT users.id, users.created_at, users.name, users.email,
                       users.password_hash, users.activated, users.version
                FROM users
                INNER JOIN tokens ON users.id = tokens.user_id
                WHERE tokens.hash = $1
                  AND tokens.scope = $2
                  AND tokens.expiry > $3
                "#,
            )
            .bind(&digest.as_bytes()[..])
            .bind(scope.as_str())
            .bind(Utc::now())
            .fetch_optional(&self.pool),
        )
        .await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn update(&self, mut user: User) -> Result<User, UserError> {
        let row = deadline(
            "users.update",
            sqlx::query(
                r#"
                UPDATE users
                SET name = $1, email = $2, password_hash = $3, activated = $4,
                    version = version + 1
                WHERE id = $5 AND version = $6
                RETURNING version
                "#,
            )
            .bind(user.name.as_str())
            .bind(user.email.as_str())
            .bind(user.password_hash.as_str())
            .bind(user.activated)
            .bind(user.id.0)
            .bind(user.version)
            .fetch_optional(&self.pool),
        )
        .await?
        .map_err(|e| {
            if is_duplicate_email(&e) {
                return UserError::DuplicateEmail;
            }
            UserError::Storage(fault("users.update", e))
        })?
        .ok_or(UserError::EditConflict)?;

        user.version = row
            .try_get("version")
            .map_err(|e| UserError::Storage(fault("users.update", e)))?;

        Ok(user)
    }
}
