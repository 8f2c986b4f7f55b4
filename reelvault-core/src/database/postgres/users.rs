use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reelvault_model::{User, UserRole};
use sqlx::PgPool;
use uuid::Uuid;

use super::storage_error;
use crate::database::ports::UserRepository;
use crate::error::{CoreError, Result};

#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, username, email, password_hash, role, created_at, updated_at FROM users";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = CoreError;

    fn try_from(row: UserRow) -> Result<Self> {
        let role = row
            .role
            .parse::<UserRole>()
            .map_err(|e| CoreError::Internal(format!("invalid role column: {e}")))?;

        Ok(User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("failed to insert user", e))?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("failed to fetch user", e))?;

        row.map(User::try_from).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("failed to fetch user by email", e))?;

        row.map(User::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<User>> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} ORDER BY created_at ASC"))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| storage_error("failed to list users", e))?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update(&self, user: &User) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                username = $2, email = $3, password_hash = $4,
                role = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("failed to update user", e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("user {}", user.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("failed to delete user", e))?;

        Ok(result.rows_affected() > 0)
    }
}
