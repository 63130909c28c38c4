use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::{ObjectStore, StoreError};

/// Documents stored as files under a base directory.
pub struct LocalStore {
    base_dir: PathBuf,
}

impl LocalStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    fn resolve(&self, key: &str) -> PathBuf {
        self.base_dir.join(key)
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    /// Writes to a `.tmp` sibling first and renames it over the target, so a
    /// reader never sees a half-written document.
    async fn put(&self, key: &str, data: Bytes) -> Result<(), StoreError> {
        let path = self.resolve(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Internal(format!("mkdir: {e}")))?;
        }
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, &data)
            .await
            .map_err(|e| StoreError::Internal(format!("write {}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::Internal(format!("rename {}: {e}", path.display())))?;
        debug!(key, bytes = data.len(), "document written");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
        let path = self.resolve(key);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(key.to_string()))
            }
            Err(e) => Err(StoreError::Internal(format!(
                "read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.resolve(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Internal(format!(
                "delete {}: {e}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store() -> (tempfile::TempDir, LocalStore) {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalStore::new(tmp.path().to_path_buf());
        (tmp, store)
    }

    #[tokio::test]
    async fn put_get_overwrite() {
        let (_tmp, store) = make_store();
        store.put("board.json", Bytes::from("[1]")).await.unwrap();
        store.put("board.json", Bytes::from("[2]")).await.unwrap();
        assert_eq!(store.get("board.json").await.unwrap(), Bytes::from("[2]"));
    }

    #[tokio::test]
    async fn put_leaves_no_temp_file() {
        let (tmp, store) = make_store();
        store.put("board.json", Bytes::from("[]")).await.unwrap();
        assert!(tmp.path().join("board.json").exists());
        assert!(!tmp.path().join("board.json.tmp").exists());
    }

    #[tokio::test]
    async fn put_creates_missing_dirs() {
        let (tmp, store) = make_store();
        store.put("nested/dir/board.json", Bytes::from("[]")).await.unwrap();
        assert!(tmp.path().join("nested/dir/board.json").exists());
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let (_tmp, store) = make_store();
        assert!(matches!(
            store.get("nope.json").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (_tmp, store) = make_store();
        store.put("board.json", Bytes::from("[]")).await.unwrap();
        store.delete("board.json").await.unwrap();
        store.delete("board.json").await.unwrap();
        assert!(store.get_opt("board.json").await.unwrap().is_none());
    }
}
