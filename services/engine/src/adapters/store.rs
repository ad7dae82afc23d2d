//! services/engine/src/adapters/store.rs
//!
//! A file-backed implementation of the `SnapshotStore` port. Each key maps to
//! one JSON file under the snapshot directory; writes go through a temp file
//! and a rename so an interrupted autosave can never leave a half-written
//! snapshot behind.

use async_trait::async_trait;
use std::path::PathBuf;
use workout_core::ports::{PortError, PortResult, SnapshotStore};

/// A snapshot store that keeps each slot as `<dir>/<key>.json`.
#[derive(Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    /// Creates the store, making sure the backing directory exists.
    pub async fn new(dir: impl Into<PathBuf>) -> PortResult<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn get(&self, key: &str) -> PortResult<Option<serde_json::Value>> {
        let raw = match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PortError::Unexpected(e.to_string())),
        };
        let value = serde_json::from_str(&raw)
            .map_err(|e| PortError::Unexpected(format!("corrupt snapshot for '{key}': {e}")))?;
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> PortResult<()> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        let raw = serde_json::to_vec(&value)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        tokio::fs::write(&tmp, raw)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> PortResult<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortError::Unexpected(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn store() -> (tempfile::TempDir, FileSnapshotStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path()).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let (_dir, store) = store().await;
        let value = json!({"session_id": "abc", "elapsed_seconds": 42});
        store.set("active_session", value.clone()).await.unwrap();
        assert_eq!(store.get("active_session").await.unwrap(), Some(value));
    }

    #[tokio::test]
    async fn get_of_missing_key_is_none() {
        let (_dir, store) = store().await;
        assert_eq!(store.get("active_session").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_overwrites_the_slot() {
        let (_dir, store) = store().await;
        store.set("active_session", json!({"v": 1})).await.unwrap();
        store.set("active_session", json!({"v": 2})).await.unwrap();
        assert_eq!(store.get("active_session").await.unwrap(), Some(json!({"v": 2})));
    }

    #[tokio::test]
    async fn delete_clears_the_slot_and_tolerates_absence() {
        let (_dir, store) = store().await;
        store.set("active_session", json!({"v": 1})).await.unwrap();
        store.delete("active_session").await.unwrap();
        assert_eq!(store.get("active_session").await.unwrap(), None);
        // Deleting again is fine.
        store.delete("active_session").await.unwrap();
    }
}
