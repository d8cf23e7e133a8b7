//! Fault reporting and lifecycle notifications

use crate::error::Error;
use tracing::{error, info, warn};

/// Receives errors raised during a sync
pub trait FaultReporter: Send + Sync {
    /// Report one error
    fn report_error(&self, error: &Error);
}

/// Reports faults through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl FaultReporter for TracingReporter {
    fn report_error(&self, err: &Error) {
        if err.is_fatal() {
            error!(stage = %err.stage(), "{err}");
        } else {
            warn!(stage = %err.stage(), "{err}");
        }
    }
}

/// Host lifecycle notifications
pub trait Lifecycle: Send + Sync {
    /// Called once after the configuration was accepted
    fn notify_ready(&self);

    /// Called once after resources were released on shutdown
    fn notify_close(&self);
}

/// Logs lifecycle transitions
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLifecycle;

impl Lifecycle for LogLifecycle {
    fn notify_ready(&self) {
        info!("Connector has been initialized.");
    }

    fn notify_close(&self) {
        info!("Connector has been closed.");
    }
}
