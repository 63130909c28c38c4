mod local;
mod memory;
mod repository;

pub use local::LocalStore;
pub use memory::MemoryStore;
pub use repository::BoardRepository;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("corrupt document {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("store error: {0}")]
    Internal(String),
}

/// A store for opaque documents keyed by string paths.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write (create or overwrite) an object as a whole.
    async fn put(&self, key: &str, data: Bytes) -> Result<(), StoreError>;

    /// Read an object. Returns `StoreError::NotFound` if absent.
    async fn get(&self, key: &str) -> Result<Bytes, StoreError>;

    /// Read an object, returning `None` if it does not exist.
    async fn get_opt(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        match self.get(key).await {
            Ok(data) => Ok(Some(data)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete an object. No-op if absent.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// The single key the whole board lives under.
pub const BOARD_KEY: &str = "zenboard_tasks.json";

// -- Configuration --

pub struct StoreConfig {
    /// Local filesystem base directory. Falls back to [`default_data_dir`].
    pub local_data_dir: Option<PathBuf>,
}

impl StoreConfig {
    pub fn data_dir(&self) -> PathBuf {
        self.local_data_dir.clone().unwrap_or_else(default_data_dir)
    }
}

/// `$XDG_DATA_HOME/zenboard`, else `~/.local/share/zenboard`, else `./zenboard`.
pub fn default_data_dir() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg)
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local/share")
    } else {
        PathBuf::from(".")
    };
    base.join("zenboard")
}

pub fn create_store(config: &StoreConfig) -> Arc<dyn ObjectStore> {
    Arc::new(LocalStore::new(config.data_dir()))
}
