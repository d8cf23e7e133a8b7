//! Checkpoint types
//!
//! Serialized to JSON and persisted between runs.

use crate::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Persisted sync checkpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncState {
    /// End time of the last successful sync (ms since epoch)
    #[serde(default, alias = "lastSyncDate", alias = "lastSyncTime")]
    pub last_sync_time: Option<Timestamp>,
}

impl SyncState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state at the given checkpoint
    pub fn at(last_sync_time: Timestamp) -> Self {
        Self {
            last_sync_time: Some(last_sync_time),
        }
    }
}
