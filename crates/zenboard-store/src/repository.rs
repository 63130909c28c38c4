use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};
use zenboard_core::task::now_millis;
use zenboard_core::{Board, Task};

use crate::{ObjectStore, StoreError, BOARD_KEY};

/// Reads and writes the whole board as one JSON document.
///
/// There is no schema version and no partial update: every save replaces
/// the document.
#[derive(Clone)]
pub struct BoardRepository {
    store: Arc<dyn ObjectStore>,
    key: String,
}

impl BoardRepository {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self::with_key(store, BOARD_KEY)
    }

    pub fn with_key(store: Arc<dyn ObjectStore>, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored board, or `None` if nothing has been saved yet.
    pub async fn load(&self) -> Result<Option<Board>, StoreError> {
        let Some(data) = self.store.get_opt(&self.key).await? else {
            return Ok(None);
        };
        let tasks: Vec<Task> =
            serde_json::from_slice(&data).map_err(|e| StoreError::Corrupt {
                key: self.key.clone(),
                reason: e.to_string(),
            })?;
        Ok(Some(Board::new(tasks)))
    }

    /// Load the stored board, seeding and saving the starter board on first run.
    pub async fn load_or_seed(&self) -> Result<Board, StoreError> {
        if let Some(board) = self.load().await? {
            info!(tasks = board.tasks().len(), key = %self.key, "board loaded");
            return Ok(board);
        }
        info!(key = %self.key, "no stored board, seeding starter tasks");
        let board = Board::seeded(now_millis());
        self.save(&board).await?;
        Ok(board)
    }

    pub async fn save(&self, board: &Board) -> Result<(), StoreError> {
        let json = serde_json::to_vec(board.tasks())
            .map_err(|e| StoreError::Internal(format!("serialize board: {e}")))?;
        self.store.put(&self.key, Bytes::from(json)).await
    }

    /// Remove the stored board so the next load seeds a fresh one.
    pub async fn reset(&self) -> Result<(), StoreError> {
        warn!(key = %self.key, "deleting stored board");
        self.store.delete(&self.key).await
    }
}
