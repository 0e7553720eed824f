use crate::{config::BoardConfig, domain::Board, error::Result};
use async_trait::async_trait;
use tokio::sync::RwLock;

pub mod codec;
pub mod file_storage;
pub mod memory_storage;

#[cfg(feature = "sqlite-storage")]
pub mod sqlite_storage;

pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;

/// String key-value store the board blob is written to
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a value, `None` when the key was never written
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes a value, replacing any previous one
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Deletes a value. Removing a key that was never written is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Write-through cache of the board over a [`KeyValueStore`].
///
/// Reads are served from the cache once the board has been loaded or saved.
/// Saves update the cache before the store write, so a failed write never
/// hides the newest board from this process.
pub struct BoardStore<S> {
    store: S,
    config: BoardConfig,
    cache: RwLock<Option<Board>>,
}

impl<S: KeyValueStore> BoardStore<S> {
    pub fn new(store: S, config: BoardConfig) -> Self {
        Self {
            store,
            config,
            cache: RwLock::new(None),
        }
    }

    /// Loads the board: from the cache, else the store, else a fresh board
    /// built from the config. An unreadable or corrupt blob is logged and
    /// replaced by the fresh board.
    pub async fn load(&self) -> Result<Board> {
        if let Some(board) = self.cache.read().await.as_ref() {
            return Ok(board.clone());
        }

        let key = &self.config.storage_key;
        let stored = match self.store.get(key).await {
            Ok(Some(blob)) => match codec::decode(&blob) {
                Ok(board) => Some(board),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "stored board is unreadable, starting fresh");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to read board, starting fresh");
                None
            }
        };

        let board = match stored {
            Some(board) => board,
            None => Board::from_config(&self.config)?,
        };

        *self.cache.write().await = Some(board.clone());
        Ok(board)
    }

    /// Caches and writes the board, returning any store failure
    pub async fn save(&self, board: &Board) -> Result<()> {
        *self.cache.write().await = Some(board.clone());

        let blob = codec::encode(board)?;
        self.store.set(&self.config.storage_key, blob).await
    }

    /// Deletes the stored board and returns a fresh one built from the
    /// config, which also becomes the cached board
    pub async fn clear(&self) -> Result<Board> {
        let board = Board::from_config(&self.config)?;
        self.store.remove(&self.config.storage_key).await?;
        *self.cache.write().await = Some(board.clone());
        tracing::info!(key = %self.config.storage_key, "stored board cleared");
        Ok(board)
    }

    /// Best-effort save: failures are logged and reported as `false`
    pub async fn persist(&self, board: &Board) -> bool {
        match self.save(board).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key = %self.config.storage_key, error = %e, "failed to persist board");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{CardInput, LaneId},
        error::KanbanError,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store whose writes always fail and whose reads are counted
    #[derive(Default)]
    struct BrokenStore {
        reads: AtomicUsize,
    }

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Err(KanbanError::StorageError("quota exceeded".to_string()))
        }

        async fn set(&self, _key: &str, _value: String) -> Result<()> {
            Err(KanbanError::StorageError("quota exceeded".to_string()))
        }

        async fn remove(&self, _key: &str) -> Result<()> {
            Err(KanbanError::StorageError("storage disabled".to_string()))
        }
    }

    #[tokio::test]
    async fn test_load_absent_builds_from_config() {
        let store = BoardStore::new(MemoryStorage::new(), BoardConfig::default().with_demo_cards());
        let board = store.load().await.unwrap();
        assert_eq!(board.lane(LaneId::Todo).unwrap().cards.len(), 2);
    }

    #[tokio::test]
    async fn test_save_then_load_from_fresh_adapter() {
        let memory = MemoryStorage::new();
        let store = BoardStore::new(memory.clone(), BoardConfig::default());
        let board = Board::default()
            .create_card(CardInput::new("A", "a"))
            .unwrap();
        store.save(&board).await.unwrap();

        let raw = memory.get("kanban-board").await.unwrap().unwrap();
        assert_eq!(codec::decode(&raw).unwrap(), board);

        let reopened = BoardStore::new(memory, BoardConfig::default());
        assert_eq!(reopened.load().await.unwrap(), board);
    }

    #[tokio::test]
    async fn test_custom_storage_key() {
        let memory = MemoryStorage::new();
        let store = BoardStore::new(memory.clone(), BoardConfig::default().with_storage_key("mine"));
        store.save(&Board::default()).await.unwrap();

        assert!(memory.get("mine").await.unwrap().is_some());
        assert!(memory.get("kanban-board").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_blob_falls_back() {
        let memory = MemoryStorage::new();
        memory.set("kanban-board", "%%%".to_string()).await.unwrap();

        let store = BoardStore::new(memory, BoardConfig::default());
        assert_eq!(store.load().await.unwrap(), Board::default());
    }

    #[tokio::test]
    async fn test_cache_serves_reads() {
        let store = BoardStore::new(BrokenStore::default(), BoardConfig::default());

        store.load().await.unwrap();
        store.load().await.unwrap();
        assert_eq!(store.store.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_write_is_logged_not_fatal() {
        let store = BoardStore::new(BrokenStore::default(), BoardConfig::default());
        let board = Board::default()
            .create_card(CardInput::new("A", "a"))
            .unwrap();

        assert!(store.save(&board).await.is_err());
        assert!(!store.persist(&board).await);
        // Memory stays authoritative
        assert_eq!(store.load().await.unwrap(), board);
        assert_eq!(store.store.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_clear_removes_blob_and_resets_cache() {
        let memory = MemoryStorage::new();
        let store = BoardStore::new(memory.clone(), BoardConfig::default().with_demo_cards());
        let board = Board::default()
            .create_card(CardInput::new("A", "a"))
            .unwrap();
        store.save(&board).await.unwrap();

        let fresh = store.clear().await.unwrap();
        assert!(memory.get("kanban-board").await.unwrap().is_none());
        assert_eq!(fresh.lane(LaneId::Todo).unwrap().cards.len(), 2);
        assert_eq!(store.load().await.unwrap(), fresh);
    }

    #[tokio::test]
    async fn test_failed_clear_keeps_cache() {
        let store = BoardStore::new(BrokenStore::default(), BoardConfig::default());
        let board = Board::default()
            .create_card(CardInput::new("A", "a"))
            .unwrap();
        store.persist(&board).await;

        assert!(store.clear().await.is_err());
        assert_eq!(store.load().await.unwrap(), board);
    }

    #[tokio::test]
    async fn test_invalid_config_surfaces_on_load() {
        let mut config = BoardConfig::default();
        config.lanes.clear();
        let store = BoardStore::new(MemoryStorage::new(), config);

        assert!(matches!(
            store.load().await,
            Err(KanbanError::ConfigError(_))
        ));
    }
}
