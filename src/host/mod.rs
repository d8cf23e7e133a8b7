//! External collaborators
//!
//! The connector talks to its host through four narrow interfaces:
//! - [`DeviceRegistry`] - is a device known to the receiving platform?
//! - [`MessageSink`] - where validated messages are delivered
//! - [`FaultReporter`] - where sync failures are reported
//! - [`Lifecycle`] - ready/close notifications
//!
//! Each has a small built-in implementation so the binary runs standalone.

mod lifecycle;
mod registry;
mod sink;

pub use lifecycle::{FaultReporter, Lifecycle, LogLifecycle, TracingReporter};
pub use registry::{AllowAllRegistry, DeviceRecord, DeviceRegistry, StaticRegistry};
pub use sink::{ChannelSink, Delivery, JsonLinesSink, MessageSink};

use std::sync::Arc;

/// The set of collaborators a connector is wired to
#[derive(Clone)]
pub struct Collaborators {
    /// Device registry lookup
    pub registry: Arc<dyn DeviceRegistry>,
    /// Downstream message sink
    pub sink: Arc<dyn MessageSink>,
    /// Fault reporting
    pub reporter: Arc<dyn FaultReporter>,
    /// Lifecycle notifications
    pub lifecycle: Arc<dyn Lifecycle>,
}

impl Collaborators {
    /// Wire a registry and sink with tracing-based reporting and lifecycle
    pub fn new(registry: Arc<dyn DeviceRegistry>, sink: Arc<dyn MessageSink>) -> Self {
        Self {
            registry,
            sink,
            reporter: Arc::new(TracingReporter),
            lifecycle: Arc::new(LogLifecycle),
        }
    }

    /// Replace the fault reporter
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn FaultReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Replace the lifecycle listener
    #[must_use]
    pub fn with_lifecycle(mut self, lifecycle: Arc<dyn Lifecycle>) -> Self {
        self.lifecycle = lifecycle;
        self
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
