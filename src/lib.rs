// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # artik-sync
//!
//! Incremental sync of device messages from ARTIK Cloud into a host platform.
//!
//! On each trigger the connector exchanges OAuth2 client credentials for an
//! access token, enumerates the account's devices page by page, fetches each
//! device's messages for the window `[last checkpoint, now]`, and forwards
//! every message whose device is known to the host's registry. The checkpoint
//! only advances when the whole sync succeeds.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use artik_sync::{Collaborators, Connector, ConnectorConfig, Result, StateManager};
//! use artik_sync::host::{ChannelSink, StaticRegistry};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ConnectorConfig::from_file("artik.yaml")?.with_env_overrides();
//!     let (sink, mut deliveries) = ChannelSink::new();
//!     let registry = StaticRegistry::from_file("devices.json")?;
//!
//!     let connector = Connector::start(
//!         &config,
//!         Collaborators::new(Arc::new(registry), Arc::new(sink)),
//!         StateManager::from_file("state.json")?,
//!     )?;
//!
//!     let report = connector.sync_from_checkpoint().await?;
//!     println!("forwarded {}", report.stats.messages_forwarded);
//!
//!     connector.close().await
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Connector                                │
//! │  start() → notify_ready    sync(last?) → SyncReport    close()  │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Auth   │   HTTP    │    Cloud      │  Forward  │   State     │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ OAuth2   │ GET/POST  │ Devices       │ Registry  │ Checkpoint  │
//! │ client   │ Rate Limit│ (offset pages)│ lookup    │ (JSON file) │
//! │ creds    │           │ Messages      │ Sink      │             │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Connector configuration
pub mod config;

/// OAuth2 client-credentials token exchange
pub mod auth;

/// HTTP client with rate limiting
pub mod http;

/// Pagination strategies
pub mod pagination;

/// ARTIK Cloud REST endpoints
pub mod cloud;

/// Host collaborators (registry, sink, faults, lifecycle)
pub mod host;

/// Registry validation and forwarding
pub mod forward;

/// Checkpoint state management
pub mod state;

/// Sync orchestration
pub mod engine;

/// Connector lifecycle
pub mod connector;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result, SyncStage};
pub use types::*;

// Re-export commonly used types
pub use config::{ConnectorConfig, Credentials};
pub use connector::{CheckResult, Connector};
pub use engine::{SyncEngine, SyncPhase, SyncReport, SyncStats};
pub use host::Collaborators;
pub use state::{StateManager, SyncState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
