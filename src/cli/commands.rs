//! CLI commands and argument parsing

use crate::types::Timestamp;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ARTIK Cloud device message sync
#[derive(Parser, Debug)]
#[command(name = "artik-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON or YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline config JSON (takes precedence over --config)
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// Checkpoint state file (JSON); in-memory when omitted
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,

    /// Device registry file (JSON array of ids or records); accepts all devices when omitted
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,

    /// Append forwarded messages to this file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Output format for command results
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Exchange credentials for an access token
    Check,

    /// List the account's device ids
    Devices,

    /// Run one sync
    Sync {
        /// Window start in ms since epoch (defaults to the stored checkpoint)
        #[arg(long)]
        since: Option<Timestamp>,
    },

    /// Sync on a fixed interval until interrupted
    Watch {
        /// Seconds between syncs
        #[arg(short, long, default_value = "60")]
        interval: u64,
    },

    /// Start HTTP server mode
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
