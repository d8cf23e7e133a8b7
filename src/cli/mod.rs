//! CLI module
//!
//! Command-line interface for running the connector.
//!
//! # Commands
//!
//! - `check` - Exchange credentials for a token
//! - `devices` - List the account's devices
//! - `sync` - Run one sync
//! - `watch` - Sync on an interval
//! - `serve` - Start HTTP server mode

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
pub use server::{router, serve, ServerConfig};

#[cfg(test)]
mod server_tests;
