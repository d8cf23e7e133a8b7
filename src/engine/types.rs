//! Engine types
//!
//! Phases, configuration and reporting for the sync engine.

use crate::config::ConnectorConfig;
use crate::error::Error;
use crate::types::{format_timestamp, SyncWindow, Timestamp};
use serde::Serialize;
use serde_json::{json, Value};

/// Where a sync currently is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SyncPhase {
    /// No sync running
    Idle,
    /// Exchanging credentials for a token
    Authenticating,
    /// Listing the account's devices
    Enumerating,
    /// Fetching one device's messages
    FetchingMessages {
        /// Device being fetched
        device_id: String,
    },
    /// Validating and forwarding one message
    Validating {
        /// Device the message came from
        device_id: String,
        /// Position of the message in the device's batch
        index: usize,
    },
    /// Persisting the checkpoint
    Committing,
    /// The last sync failed
    Aborted,
}

impl SyncPhase {
    /// Whether a sync is in flight
    pub fn is_running(&self) -> bool {
        !matches!(self, Self::Idle | Self::Aborted)
    }
}

/// Configuration for sync operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Window start when the trigger carries no checkpoint
    pub default_start_time: Timestamp,
    /// Device message fetches allowed in flight
    pub fetch_concurrency: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            default_start_time: 0,
            fetch_concurrency: 1,
        }
    }
}

impl SyncConfig {
    /// Take the sync settings from the connector configuration
    pub fn from_connector(config: &ConnectorConfig) -> Self {
        Self {
            default_start_time: config.default_start_time,
            fetch_concurrency: config.fetch_concurrency,
        }
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    /// Devices returned by enumeration
    pub devices_enumerated: usize,
    /// Devices whose messages were fetched and processed
    pub devices_synced: usize,
    /// Messages fetched across all devices
    pub messages_fetched: usize,
    /// Messages delivered to the sink
    pub messages_forwarded: usize,
    /// Messages rejected during validation or delivery
    pub messages_rejected: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }
}

/// Outcome of a successful sync
#[derive(Debug)]
pub struct SyncReport {
    /// Window that was synced
    pub window: SyncWindow,
    /// Counters
    pub stats: SyncStats,
    /// Per-message failures that did not abort the sync
    pub failures: Vec<Error>,
}

impl SyncReport {
    /// New checkpoint written by this sync
    pub fn checkpoint(&self) -> Timestamp {
        self.window.end_time
    }

    /// Whether every fetched message was forwarded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// JSON summary for logs and the HTTP API
    pub fn to_json(&self) -> Value {
        json!({
            "window": {
                "start_time": self.window.start_time,
                "end_time": self.window.end_time,
                "start": format_timestamp(self.window.start_time),
                "end": format_timestamp(self.window.end_time),
            },
            "checkpoint": self.checkpoint(),
            "stats": self.stats,
            "failures": self
                .failures
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
        })
    }
}
