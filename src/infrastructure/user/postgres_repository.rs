//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::user::{NewUser, User, UserChanges, UserId, UserRepository, UserType};
use crate::domain::DomainError;

const USER_COLUMNS: &str = "id, email, first_name, last_name, phone_number, user_type, \
                            is_active, password_hash, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the users table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                email TEXT NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                phone_number TEXT,
                user_type TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                password_hash TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create users table: {}", e)))?;

        sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS users_email_key ON users (LOWER(email))")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create email index: {}", e)))?;

        Ok(())
    }
}

fn map_write_error(e: sqlx::Error, email: &str, action: &str) -> DomainError {
    let msg = e.to_string();

    if msg.contains("duplicate key") || msg.contains("unique constraint") {
        DomainError::conflict(format!("Email '{}' already exists", email))
    } else {
        DomainError::storage(format!("Failed to {} user: {}", action, e))
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        let mut users = Vec::with_capacity(rows.len());

        for row in rows {
            users.push(row_to_user(&row)?);
        }

        Ok(users)
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, data: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (email, first_name, last_name, phone_number, user_type,
                               is_active, password_hash)
            VALUES ($1, $2, $3, $4, $5, TRUE, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&data.email)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.phone_number)
        .bind(data.user_type.as_str())
        .bind(&data.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &data.email, "create"))?;

        row_to_user(&row)
    }

    async fn update(&self, id: UserId, changes: &UserChanges) -> Result<User, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                phone_number = CASE WHEN $9 THEN NULL ELSE COALESCE($5, phone_number) END,
                user_type = COALESCE($6, user_type),
                is_active = COALESCE($7, is_active),
                password_hash = COALESCE($8, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id.value())
        .bind(&changes.email)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(changes.phone_number.clone().flatten())
        .bind(changes.user_type.map(|t| t.as_str()))
        .bind(changes.is_active)
        .bind(&changes.password_hash)
        .bind(matches!(changes.phone_number, Some(None)))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, changes.email.as_deref().unwrap_or_default(), "update"))?;

        match row {
            Some(row) => row_to_user(&row),
            None => Err(DomainError::not_found(format!("User '{}' not found", id))),
        }
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Database unreachable: {}", e)))?;

        Ok(())
    }
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let get_err = |e: sqlx::Error| DomainError::storage(format!("Failed to read user row: {}", e));

    let user_type: String = row.try_get("user_type").map_err(get_err)?;
    let user_type = user_type
        .parse::<UserType>()
        .map_err(|e| DomainError::storage(e.to_string()))?;

    Ok(User::from_parts(
        UserId::new(row.try_get("id").map_err(get_err)?),
        row.try_get("email").map_err(get_err)?,
        row.try_get("first_name").map_err(get_err)?,
        row.try_get("last_name").map_err(get_err)?,
        row.try_get("phone_number").map_err(get_err)?,
        user_type,
        row.try_get("is_active").map_err(get_err)?,
        row.try_get("password_hash").map_err(get_err)?,
        row.try_get("created_at").map_err(get_err)?,
        row.try_get("updated_at").map_err(get_err)?,
    ))
}
