//! Execution engine module
//!
//! Sequences one incremental sync:
//!
//! ```text
//! Idle → Authenticating → Enumerating → FetchingMessages(device)
//!      → Validating(message) → … → Committing → Idle
//! ```
//!
//! Any auth, enumeration, fetch, sink flush or checkpoint failure moves the
//! engine to `Aborted`, is handed to the fault reporter, and leaves the
//! checkpoint untouched so the next trigger re-syncs the same window.
//! Per-message validation failures are reported individually and do not stop
//! the sync.

mod types;

pub use types::{SyncConfig, SyncPhase, SyncReport, SyncStats};

use crate::auth::{AccessToken, TokenExchanger};
use crate::cloud::CloudApi;
use crate::config::{ConnectorConfig, Credentials};
use crate::error::{Error, Result};
use crate::forward::Forwarder;
use crate::host::{Collaborators, FaultReporter};
use crate::http::{HttpClient, HttpClientConfig};
use crate::state::StateManager;
use crate::types::{format_timestamp, DeviceId, SyncWindow, Timestamp};
use futures::StreamExt;
use std::sync::{Arc, RwLock};
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Sync engine for orchestrating one account's device/message sync
pub struct SyncEngine {
    credentials: Credentials,
    exchanger: TokenExchanger,
    api: CloudApi,
    forwarder: Forwarder,
    reporter: Arc<dyn FaultReporter>,
    state: StateManager,
    config: SyncConfig,
    phase: RwLock<SyncPhase>,
    /// Held for the whole duration of a sync
    run_lock: Mutex<()>,
}

impl SyncEngine {
    /// Build an engine from configuration and collaborators
    pub fn from_config(
        config: &ConnectorConfig,
        collaborators: &Collaborators,
        state: StateManager,
    ) -> Result<Self> {
        let http = HttpClient::with_config(HttpClientConfig::from_settings(&config.http))?;

        Ok(Self {
            credentials: config.credentials(),
            exchanger: TokenExchanger::new(&config.token_url, http.clone()),
            api: CloudApi::from_config(config, http)?,
            forwarder: Forwarder::new(
                Arc::clone(&collaborators.registry),
                Arc::clone(&collaborators.sink),
            ),
            reporter: Arc::clone(&collaborators.reporter),
            state,
            config: SyncConfig::from_connector(config),
            phase: RwLock::new(SyncPhase::Idle),
            run_lock: Mutex::new(()),
        })
    }

    /// Get the state manager
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Get the sync configuration
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Current phase
    pub fn phase(&self) -> SyncPhase {
        self.phase
            .read()
            .map_or(SyncPhase::Idle, |phase| phase.clone())
    }

    /// Whether a sync currently holds the run-lock
    pub fn is_busy(&self) -> bool {
        self.run_lock.try_lock().is_err()
    }

    /// Wait for an in-flight sync (if any) to finish
    pub async fn wait_idle(&self) {
        drop(self.run_lock.lock().await);
    }

    /// Exchange credentials once, without syncing
    pub async fn check(&self) -> Result<AccessToken> {
        self.exchanger.exchange(&self.credentials).await
    }

    /// Authenticate and enumerate devices, without fetching messages
    pub async fn list_devices(&self) -> Result<Vec<DeviceId>> {
        let token = self.exchanger.exchange(&self.credentials).await?;
        self.api
            .list_devices(&self.credentials.account_id, token.secret())
            .await
    }

    /// Sync starting from the persisted checkpoint
    pub async fn sync_from_checkpoint(&self) -> Result<SyncReport> {
        let checkpoint = self.state.last_sync_time().await;
        self.sync(checkpoint).await
    }

    /// Run one sync
    ///
    /// `last_sync_time` is the previous checkpoint; `None` starts the window
    /// at the configured default. Fails with [`Error::SyncInProgress`] if
    /// another sync is running. On success the checkpoint advances to the
    /// window's end time.
    pub async fn sync(&self, last_sync_time: Option<Timestamp>) -> Result<SyncReport> {
        let Ok(_guard) = self.run_lock.try_lock() else {
            warn!("Sync trigger ignored, a sync is already running");
            return Err(Error::SyncInProgress);
        };

        let started = Instant::now();
        let start_time = last_sync_time.unwrap_or(self.config.default_start_time);
        let window = SyncWindow::until_now(start_time);

        info!(
            start = %format_timestamp(window.start_time),
            end = %format_timestamp(window.end_time),
            "Starting sync"
        );

        let mut report = SyncReport {
            window,
            stats: SyncStats::new(),
            failures: Vec::new(),
        };

        let outcome = match self.run(&window, &mut report).await {
            Ok(()) => self.commit(&window).await,
            Err(e) => Err(e),
        };
        report.stats.duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(()) => {
                self.set_phase(SyncPhase::Idle);
                info!(
                    devices = report.stats.devices_synced,
                    forwarded = report.stats.messages_forwarded,
                    rejected = report.stats.messages_rejected,
                    duration_ms = report.stats.duration_ms,
                    "Sync complete"
                );
                Ok(report)
            }
            Err(e) => {
                self.abort(&e);
                Err(e)
            }
        }
    }

    async fn run(&self, window: &SyncWindow, report: &mut SyncReport) -> Result<()> {
        self.set_phase(SyncPhase::Authenticating);
        let token = self.exchanger.exchange(&self.credentials).await?;
        let token = token.secret();

        self.set_phase(SyncPhase::Enumerating);
        let devices = self
            .api
            .list_devices(&self.credentials.account_id, token)
            .await?;
        report.stats.devices_enumerated = devices.len();

        // Results come back in device order; dropping the stream on the
        // first error cancels fetches still in flight.
        let mut fetches = futures::stream::iter(devices)
            .map(|device_id| async move {
                self.set_phase(SyncPhase::FetchingMessages {
                    device_id: device_id.clone(),
                });
                let result = self.api.fetch_messages(token, &device_id, window).await;
                (device_id, result)
            })
            .buffered(self.config.fetch_concurrency.max(1));

        while let Some((device_id, result)) = fetches.next().await {
            let messages = result?;
            report.stats.messages_fetched += messages.len();

            for (index, message) in messages.iter().enumerate() {
                self.set_phase(SyncPhase::Validating {
                    device_id: device_id.clone(),
                    index,
                });

                match self.forwarder.validate_and_forward(message).await {
                    Ok(()) => report.stats.messages_forwarded += 1,
                    Err(e) => {
                        warn!(sdid = %message.sdid, "Message rejected: {e}");
                        self.reporter.report_error(&e);
                        report.stats.messages_rejected += 1;
                        report.failures.push(e);
                    }
                }
            }

            report.stats.devices_synced += 1;
        }

        Ok(())
    }

    /// Flush the sink, then advance the checkpoint
    ///
    /// A failed flush aborts the sync before the checkpoint moves.
    async fn commit(&self, window: &SyncWindow) -> Result<()> {
        self.set_phase(SyncPhase::Committing);
        self.forwarder
            .flush()
            .await
            .map_err(|e| Error::sink_flush(e.to_string()))?;
        self.state.commit(window.end_time).await?;
        debug!(checkpoint = window.end_time, "Checkpoint advanced");
        Ok(())
    }

    fn abort(&self, err: &Error) {
        self.set_phase(SyncPhase::Aborted);
        error!(stage = %err.stage(), "Sync aborted: {err}");
        self.reporter.report_error(err);
    }

    fn set_phase(&self, phase: SyncPhase) {
        debug!(?phase, "Sync phase");
        if let Ok(mut current) = self.phase.write() {
            *current = phase;
        }
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("credentials", &self.credentials)
            .field("config", &self.config)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}
