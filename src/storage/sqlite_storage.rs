use crate::{
    error::{KanbanError, Result},
    storage::KeyValueStore,
};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::{path::Path, sync::Mutex};

/// SQLite-backed key-value store using a single `kv` table
pub struct SqliteStorage {
    connection: Mutex<Connection>,
}

fn storage_error(e: rusqlite::Error) -> KanbanError {
    KanbanError::StorageError(e.to_string())
}

impl SqliteStorage {
    /// Opens (or creates) a database file
    pub fn open(database_path: impl AsRef<Path>) -> Result<Self> {
        let connection = Connection::open(database_path).map_err(storage_error)?;
        Self::with_connection(connection)
    }

    /// Opens a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory().map_err(storage_error)?;
        Self::with_connection(connection)
    }

    fn with_connection(connection: Connection) -> Result<Self> {
        connection
            .execute(
                "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
                [],
            )
            .map_err(storage_error)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| KanbanError::StorageError("sqlite connection poisoned".to_string()))
    }
}

#[async_trait]
impl KeyValueStore for SqliteStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let connection = self.lock()?;
        connection
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(storage_error)
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let connection = self.lock()?;
        connection
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(storage_error)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let connection = self.lock()?;
        connection
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(storage_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_set_and_get() {
        let storage = SqliteStorage::open_in_memory().unwrap();

        assert!(storage.get("k").await.unwrap().is_none());
        storage.set("k", "one".to_string()).await.unwrap();
        storage.set("k", "two".to_string()).await.unwrap();
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_remove() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        storage.remove("k").await.unwrap();

        storage.set("k", "v".to_string()).await.unwrap();
        storage.set("keep", "w".to_string()).await.unwrap();
        storage.remove("k").await.unwrap();

        assert!(storage.get("k").await.unwrap().is_none());
        assert_eq!(storage.get("keep").await.unwrap().as_deref(), Some("w"));
    }

    #[tokio::test]
    async fn test_persists_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("board.db");

        SqliteStorage::open(&path)
            .unwrap()
            .set("k", "v".to_string())
            .await
            .unwrap();

        let reopened = SqliteStorage::open(&path).unwrap();
        assert_eq!(reopened.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
