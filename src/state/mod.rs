//! Checkpoint state module
//!
//! The only durable state of the connector is the end time of the last
//! successful sync. It is read when a sync starts and written once that sync
//! completes without a fatal error.
//!
//! # Overview
//!
//! - `SyncState` - The serialized checkpoint
//! - `StateManager` - File-based (or in-memory) persistence

mod manager;
mod types;

pub use manager::StateManager;
pub use types::SyncState;
