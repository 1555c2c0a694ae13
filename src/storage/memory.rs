use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{AppError, StorageError};

use super::models::{NewUser, User, WaitlistEntry};
use super::Storage;

#[derive(Debug)]
struct Tables {
    users: HashMap<i32, User>,
    waitlist: HashMap<i32, WaitlistEntry>,
    next_user_id: i32,
    next_entry_id: i32,
}

/// In-process storage backend. Sessions aside, this is the whole state of a
/// database-less deployment; everything is lost on restart.
///
/// The duplicate-email check and the insert happen under one write guard,
/// so uniqueness holds even under concurrent submissions.
pub struct MemStorage {
    tables: RwLock<Tables>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                users: HashMap::new(),
                waitlist: HashMap::new(),
                next_user_id: 1,
                next_entry_id: 1,
            }),
        }
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn all_waitlist_entries(&self) -> Result<Vec<WaitlistEntry>, AppError> {
        let tables = self.tables.read().await;
        let mut entries: Vec<WaitlistEntry> = tables.waitlist.values().cloned().collect();
        // Ties on created_at are broken by id so the order is total.
        entries.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(entries)
    }

    async fn waitlist_entry_by_email(
        &self,
        email: &str,
    ) -> Result<Option<WaitlistEntry>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .waitlist
            .values()
            .find(|entry| entry.email == email)
            .cloned())
    }

    async fn add_to_waitlist(&self, email: &str) -> Result<WaitlistEntry, AppError> {
        let mut tables = self.tables.write().await;

        if tables.waitlist.values().any(|entry| entry.email == email) {
            return Err(StorageError::Duplicate.into());
        }

        let id = tables.next_entry_id;
        tables.next_entry_id += 1;

        let entry = WaitlistEntry {
            id,
            email: email.to_string(),
            created_at: Utc::now(),
        };
        tables.waitlist.insert(id, entry.clone());

        Ok(entry)
    }

    async fn delete_waitlist_entry(&self, id: i32) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.waitlist.remove(&id).is_some())
    }

    async fn user(&self, id: i32) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;

        let id = tables.next_user_id;
        tables.next_user_id += 1;

        let user = User {
            id,
            username: user.username,
            password: user.password,
        };
        tables.users.insert(id, user.clone());

        Ok(user)
    }
}
