//! Persistence for waitlist entries and admin accounts.
//!
//! Two interchangeable backends sit behind the [`Storage`] trait: an
//! in-process map store and a Postgres store. [`connect`] picks one from
//! startup configuration.

pub mod memory;
pub mod models;
pub mod postgres;

pub use memory::MemStorage;
pub use models::{NewUser, User, WaitlistEntry};
pub use postgres::PgStorage;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::Settings;
use crate::error::AppError;

#[async_trait]
pub trait Storage: Send + Sync {
    /// All waitlist entries, ascending by creation time.
    async fn all_waitlist_entries(&self) -> Result<Vec<WaitlistEntry>, AppError>;

    async fn waitlist_entry_by_email(&self, email: &str)
        -> Result<Option<WaitlistEntry>, AppError>;

    /// Insert a new entry, assigning the next id and stamping the current
    /// time. A duplicate email is a `StorageError::Duplicate`.
    async fn add_to_waitlist(&self, email: &str) -> Result<WaitlistEntry, AppError>;

    /// Returns whether a row existed and was removed.
    async fn delete_waitlist_entry(&self, id: i32) -> Result<bool, AppError>;

    async fn user(&self, id: i32) -> Result<Option<User>, AppError>;

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Username uniqueness is not enforced at this layer.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;
}

/// Storage factory: a configured database URL selects Postgres, otherwise
/// the in-memory backend.
pub async fn connect(settings: &Settings) -> Result<Arc<dyn Storage>, AppError> {
    match settings.database.url.as_deref() {
        Some(url) if !url.is_empty() => {
            info!("using postgres storage backend");
            let storage =
                PgStorage::connect(url, settings.database.max_connections).await?;
            Ok(Arc::new(storage))
        }
        _ => {
            info!("no database url configured, using in-memory storage backend");
            Ok(Arc::new(MemStorage::new()))
        }
    }
}
