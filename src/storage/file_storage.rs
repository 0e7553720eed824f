use crate::{
    error::{KanbanError, Result},
    storage::KeyValueStore,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-based key-value store: one file per key under a directory
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const STORE_DIR: &'static str = ".kanban";
    const VALUE_EXTENSION: &'static str = "b64";

    /// Creates a new FileStorage rooted in `project_root/.kanban`
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::STORE_DIR),
        }
    }

    fn value_file(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(KanbanError::StorageError(format!(
                "invalid storage key {:?}",
                key
            )));
        }
        Ok(self
            .root_path
            .join(format!("{}.{}", key, Self::VALUE_EXTENSION)))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let file_path = self.value_file(key)?;

        if !file_path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&file_path).await?;
        Ok(Some(contents))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let file_path = self.value_file(key)?;
        self.ensure_directory_exists(&self.root_path).await?;

        // Write to a sibling temp file and rename so readers never see half a blob
        let tmp_path = file_path.with_extension("tmp");
        fs::write(&tmp_path, value).await?;
        fs::rename(&tmp_path, &file_path).await?;

        tracing::debug!(path = %file_path.display(), "wrote value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let file_path = self.value_file(key)?;

        match fs::remove_file(&file_path).await {
            Ok(()) => {
                tracing::debug!(path = %file_path.display(), "removed value");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::BoardConfig,
        domain::{Board, CardInput},
        storage::BoardStore,
    };
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_get_before_any_write() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        assert!(storage.get("kanban-board").await.unwrap().is_none());
        assert!(!storage.root_path.exists());
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        storage.set("kanban-board", "abc".to_string()).await.unwrap();
        storage.set("kanban-board", "xyz".to_string()).await.unwrap();

        assert_eq!(
            storage.get("kanban-board").await.unwrap().as_deref(),
            Some("xyz")
        );
        assert!(temp_dir.path().join(".kanban/kanban-board.b64").exists());
        assert!(!temp_dir.path().join(".kanban/kanban-board.tmp").exists());
    }

    #[tokio::test]
    async fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        // Nothing written yet
        storage.remove("kanban-board").await.unwrap();

        storage.set("kanban-board", "abc".to_string()).await.unwrap();
        storage.remove("kanban-board").await.unwrap();
        assert!(storage.get("kanban-board").await.unwrap().is_none());
        assert!(!temp_dir.path().join(".kanban/kanban-board.b64").exists());

        assert!(storage.remove("../escape").await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        assert!(storage.set("../escape", "x".to_string()).await.is_err());
        assert!(storage.get("a/b").await.is_err());
        assert!(storage.get("").await.is_err());
    }

    #[tokio::test]
    async fn test_board_survives_restart() {
        let temp_dir = TempDir::new().unwrap();
        let board = Board::default()
            .create_card(CardInput::new("Pay Rent", "Transfer via NEFT"))
            .unwrap();

        let store = BoardStore::new(FileStorage::new(temp_dir.path()), BoardConfig::default());
        store.save(&board).await.unwrap();

        let reopened = BoardStore::new(FileStorage::new(temp_dir.path()), BoardConfig::default());
        assert_eq!(reopened.load().await.unwrap(), board);
    }
}
