//! SQLite-backed origin storage.

use sqlx::sqlite::SqlitePool;

use crate::storage::{Storage, StorageError};

/// Durable [`Storage`] for one origin. Other origins' rows are invisible.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
    origin: String,
}

impl SqliteStorage {
    pub fn new(pool: SqlitePool, origin: &str) -> Self {
        Self {
            pool,
            origin: origin.to_string(),
        }
    }
}

impl Storage for SqliteStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM storage WHERE origin = ? AND key = ?")
                .bind(&self.origin)
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|r| r.0))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO storage (origin, key, value) VALUES (?, ?, ?)
             ON CONFLICT (origin, key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
        )
        .bind(&self.origin)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM storage WHERE origin = ? AND key = ?")
            .bind(&self.origin)
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
