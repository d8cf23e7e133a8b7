//! State manager implementation
//!
//! Provides file-based checkpoint persistence with atomic writes.

use super::types::SyncState;
use crate::error::{Error, Result};
use crate::types::Timestamp;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// State manager for persisting and loading the checkpoint
#[derive(Debug, Clone)]
pub struct StateManager {
    /// Path to the state file (empty = in-memory)
    path: PathBuf,
    /// Current state (cached)
    state: Arc<RwLock<SyncState>>,
}

impl StateManager {
    /// Create a state manager writing to `path`, starting empty
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            state: Arc::new(RwLock::new(SyncState::new())),
        }
    }

    /// Create an in-memory state manager (no file persistence)
    pub fn in_memory() -> Self {
        Self::new(PathBuf::new())
    }

    /// Create a state manager from a file, loading existing state if present
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| Error::State {
                message: format!("Failed to read state file: {e}"),
            })?;
            parse_state(&contents)?
        } else {
            SyncState::new()
        };

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// Create an in-memory state manager from inline JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let state = parse_state(json)?;
        Ok(Self {
            path: PathBuf::new(),
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> SyncState {
        *self.state.read().await
    }

    /// End time of the last successful sync
    pub async fn last_sync_time(&self) -> Option<Timestamp> {
        self.state.read().await.last_sync_time
    }

    /// Advance the checkpoint and persist it
    ///
    /// The in-memory value is only replaced once the file write succeeded.
    pub async fn commit(&self, end_time: Timestamp) -> Result<()> {
        let next = SyncState::at(end_time);
        self.persist(&next).await?;
        *self.state.write().await = next;
        Ok(())
    }

    /// Export state as JSON string
    pub async fn to_json(&self) -> Result<String> {
        let state = self.state.read().await;
        serde_json::to_string(&*state).map_err(|e| Error::State {
            message: format!("Failed to serialize state: {e}"),
        })
    }

    /// Get the state file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if using in-memory mode
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str().is_empty()
    }

    /// Write `state` to the state file (no-op in memory)
    async fn persist(&self, state: &SyncState) -> Result<()> {
        if self.is_in_memory() {
            return Ok(());
        }

        let contents = serde_json::to_string_pretty(state).map_err(|e| Error::State {
            message: format!("Failed to serialize state: {e}"),
        })?;

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::State {
                message: format!("Failed to write state file: {e}"),
            })?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::State {
                message: format!("Failed to rename state file: {e}"),
            })?;

        Ok(())
    }
}

fn parse_state(json: &str) -> Result<SyncState> {
    serde_json::from_str(json).map_err(|e| Error::State {
        message: format!("Failed to parse state: {e}"),
    })
}
