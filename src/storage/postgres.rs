use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::error::{AppError, StorageError};

use super::models::{NewUser, User, WaitlistEntry};
use super::Storage;

/// Postgres-backed storage. Uniqueness of waitlist emails rests on the
/// database constraint, closing the check-then-insert window the in-memory
/// backend guards with a lock.
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        info!("connected to postgres and applied migrations");
        Ok(Self { pool })
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn all_waitlist_entries(&self) -> Result<Vec<WaitlistEntry>, AppError> {
        let entries = sqlx::query_as::<_, WaitlistEntry>(
            "SELECT id, email, created_at FROM waitlist_entries ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn waitlist_entry_by_email(
        &self,
        email: &str,
    ) -> Result<Option<WaitlistEntry>, AppError> {
        let entry = sqlx::query_as::<_, WaitlistEntry>(
            "SELECT id, email, created_at FROM waitlist_entries WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn add_to_waitlist(&self, email: &str) -> Result<WaitlistEntry, AppError> {
        let entry = sqlx::query_as::<_, WaitlistEntry>(
            "INSERT INTO waitlist_entries (email) VALUES ($1) RETURNING id, email, created_at",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn delete_waitlist_entry(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM waitlist_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn user(&self, id: i32) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password) VALUES ($1, $2) RETURNING id, username, password",
        )
        .bind(&user.username)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}
