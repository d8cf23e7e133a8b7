//! Connector lifecycle
//!
//! Wraps a [`SyncEngine`] with the host lifecycle: configuration is validated
//! and `notify_ready` fires once on start; `close` waits for any in-flight
//! sync, flushes the sink and fires `notify_close` once.

use crate::config::ConnectorConfig;
use crate::engine::{SyncEngine, SyncPhase, SyncReport};
use crate::error::{Error, Result};
use crate::host::{Collaborators, Lifecycle, MessageSink};
use crate::state::StateManager;
use crate::types::{DeviceId, Timestamp};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

// ============================================================================
// Check Result
// ============================================================================

/// Result of a credential check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the token exchange succeeded
    pub success: bool,

    /// Error message if failed
    pub message: Option<String>,
}

impl CheckResult {
    /// Create a successful check result
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Create a failed check result
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

// ============================================================================
// Connector
// ============================================================================

/// A started connector
pub struct Connector {
    engine: Arc<SyncEngine>,
    sink: Arc<dyn MessageSink>,
    lifecycle: Arc<dyn Lifecycle>,
    closed: AtomicBool,
}

impl Connector {
    /// Validate configuration, build the engine and notify the host
    pub fn start(
        config: &ConnectorConfig,
        collaborators: Collaborators,
        state: StateManager,
    ) -> Result<Self> {
        config.validate()?;
        let engine = SyncEngine::from_config(config, &collaborators, state)?;

        collaborators.lifecycle.notify_ready();
        info!(account_id = %config.account_id, "Connector started");

        Ok(Self {
            engine: Arc::new(engine),
            sink: collaborators.sink,
            lifecycle: collaborators.lifecycle,
            closed: AtomicBool::new(false),
        })
    }

    /// Shared handle to the engine
    pub fn engine(&self) -> Arc<SyncEngine> {
        Arc::clone(&self.engine)
    }

    /// Current sync phase
    pub fn phase(&self) -> SyncPhase {
        self.engine.phase()
    }

    /// Exchange credentials once
    pub async fn check(&self) -> CheckResult {
        match self.engine.check().await {
            Ok(_) => CheckResult::success(),
            Err(e) => CheckResult::failure(e.to_string()),
        }
    }

    /// Enumerate the account's devices
    pub async fn devices(&self) -> Result<Vec<DeviceId>> {
        self.ensure_open()?;
        self.engine.list_devices().await
    }

    /// Run one sync from `last_sync_time` (or the default start)
    pub async fn sync(&self, last_sync_time: Option<Timestamp>) -> Result<SyncReport> {
        self.ensure_open()?;
        self.engine.sync(last_sync_time).await
    }

    /// Run one sync from the persisted checkpoint
    pub async fn sync_from_checkpoint(&self) -> Result<SyncReport> {
        self.ensure_open()?;
        self.engine.sync_from_checkpoint().await
    }

    /// Whether `close` has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Wait for any in-flight sync, flush the sink and notify the host
    ///
    /// Calling this more than once is a no-op.
    pub async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        self.engine.wait_idle().await;
        let flushed = self.sink.flush().await;
        if let Err(e) = &flushed {
            warn!("Failed to flush sink on close: {e}");
        }

        self.lifecycle.notify_close();
        flushed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::Other("Connector is closed".to_string()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("engine", &self.engine)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
