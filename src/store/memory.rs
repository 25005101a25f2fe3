//! In-process user store.
//!
//! Mirrors an unconstrained remote table: inserts never check for an existing
//! username, so duplicate rows are possible exactly as they are remotely.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, UserStore};
use crate::user::{NewUser, UserRecord};

#[derive(Default)]
pub struct MemoryUserStore {
    rows: RwLock<Vec<UserRecord>>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `rows`.
    #[must_use]
    pub fn with_users(rows: Vec<UserRecord>) -> Self {
        Self { rows: RwLock::new(rows) }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Every row whose username matches, including duplicates.
    pub async fn rows_for(&self, username: &str) -> Vec<UserRecord> {
        self.rows
            .read()
            .await
            .iter()
            .filter(|r| r.username == username)
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let mut matches = self.rows_for(username).await;
        match matches.len() {
            0 | 1 => Ok(matches.pop()),
            n => Err(StoreError::Ambiguous(n)),
        }
    }

    async fn insert(&self, user: &NewUser) -> Result<UserRecord, StoreError> {
        let created_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|e| StoreError::Parse(e.to_string()))?;
        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            name: user.name.clone(),
            username: user.username.clone(),
            role: user.role,
            password: user.password.clone(),
            created_at,
        };
        self.rows.write().await.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
