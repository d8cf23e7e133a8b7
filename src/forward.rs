//! Device validation and forwarding
//!
//! A message is only delivered downstream when its source device is known to
//! the device registry. Failures here never abort a sync; the orchestrator
//! records and reports them and moves on to the next message.

use crate::error::{Error, Result};
use crate::host::{DeviceRegistry, MessageSink};
use crate::types::Message;
use std::sync::Arc;
use tracing::debug;

/// Validates messages against the registry and delivers them to the sink
#[derive(Clone)]
pub struct Forwarder {
    registry: Arc<dyn DeviceRegistry>,
    sink: Arc<dyn MessageSink>,
}

impl Forwarder {
    /// Create a forwarder
    pub fn new(registry: Arc<dyn DeviceRegistry>, sink: Arc<dyn MessageSink>) -> Self {
        Self { registry, sink }
    }

    /// Deliver `message` if its device is registered
    ///
    /// Returns [`Error::NotRegistered`] without delivering when the registry
    /// has no record for `message.sdid`. The payload is passed on unmodified.
    pub async fn validate_and_forward(&self, message: &Message) -> Result<()> {
        let record = self
            .registry
            .lookup(&message.sdid)
            .await
            .map_err(|e| match e {
                Error::Registry { .. } => e,
                other => Error::registry(&message.sdid, other.to_string()),
            })?;

        if record.is_none() {
            return Err(Error::not_registered(&message.sdid));
        }

        self.sink
            .deliver(&message.sdid, &message.payload)
            .await
            .map_err(|e| match e {
                Error::Delivery { .. } => e,
                other => Error::delivery(&message.sdid, other.to_string()),
            })?;

        debug!(sdid = %message.sdid, "Message forwarded");
        Ok(())
    }

    /// Flush the underlying sink
    pub async fn flush(&self) -> Result<()> {
        self.sink.flush().await
    }
}

impl std::fmt::Debug for Forwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forwarder").finish_non_exhaustive()
    }
}
