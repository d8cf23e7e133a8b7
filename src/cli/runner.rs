//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ConnectorConfig;
use crate::connector::Connector;
use crate::error::{Error, Result};
use crate::host::{
    AllowAllRegistry, Collaborators, DeviceRegistry, JsonLinesSink, MessageSink, StaticRegistry,
};
use crate::state::StateManager;
use crate::types::Timestamp;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Check => self.check().await,
            Commands::Devices => self.devices().await,
            Commands::Sync { since } => self.sync(*since).await,
            Commands::Watch { interval } => self.watch(Duration::from_secs(*interval)).await,
            Commands::Serve { port } => {
                let connector = Arc::new(self.start()?);
                crate::cli::serve(crate::cli::ServerConfig::new(*port), connector).await
            }
        }
    }

    // ========================================================================
    // Wiring
    // ========================================================================

    /// Load configuration: inline JSON, then file, then environment overrides
    fn load_config(&self) -> Result<ConnectorConfig> {
        let config = if let Some(json_str) = &self.cli.config_json {
            ConnectorConfig::from_json(json_str)
                .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?
        } else if let Some(path) = &self.cli.config {
            ConnectorConfig::from_file(path)?
        } else {
            ConnectorConfig::default()
        };

        Ok(config.with_env_overrides())
    }

    /// Load checkpoint state
    fn load_state(&self) -> Result<StateManager> {
        match &self.cli.state {
            Some(path) => StateManager::from_file(path),
            None => Ok(StateManager::in_memory()),
        }
    }

    fn collaborators(&self) -> Result<Collaborators> {
        let registry: Arc<dyn DeviceRegistry> = match &self.cli.registry {
            Some(path) => {
                let registry = StaticRegistry::from_file(path)?;
                info!(devices = registry.len(), "Loaded device registry");
                Arc::new(registry)
            }
            None => {
                warn!("No device registry given, every device is accepted");
                Arc::new(AllowAllRegistry)
            }
        };

        let sink: Arc<dyn MessageSink> = match &self.cli.output {
            Some(path) => Arc::new(JsonLinesSink::append_to(path)?),
            None => Arc::new(JsonLinesSink::stdout()),
        };

        Ok(Collaborators::new(registry, sink))
    }

    fn start(&self) -> Result<Connector> {
        let config = self.load_config()?;
        Connector::start(&config, self.collaborators()?, self.load_state()?)
    }

    // ========================================================================
    // Commands
    // ========================================================================

    async fn check(&self) -> Result<()> {
        let connector = self.start()?;
        let result = connector.check().await;

        self.output_message(&json!({
            "type": "CONNECTION_STATUS",
            "connectionStatus": {
                "status": if result.success { "SUCCEEDED" } else { "FAILED" },
                "message": result.message,
            }
        }));

        connector.close().await?;
        match result.message {
            Some(message) if !result.success => Err(Error::Other(message)),
            _ => Ok(()),
        }
    }

    async fn devices(&self) -> Result<()> {
        let connector = self.start()?;
        let devices = connector.devices().await;
        connector.close().await?;

        let devices = devices?;
        self.output_message(&json!({
            "type": "DEVICES",
            "count": devices.len(),
            "devices": devices,
        }));
        Ok(())
    }

    async fn sync(&self, since: Option<Timestamp>) -> Result<()> {
        let connector = self.start()?;
        let result = match since {
            Some(start) => connector.sync(Some(start)).await,
            None => connector.sync_from_checkpoint().await,
        };
        connector.close().await?;

        let report = result?;
        self.output_message(&json!({
            "type": "SYNC_REPORT",
            "report": report.to_json(),
        }));
        Ok(())
    }

    async fn watch(&self, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            return Err(Error::invalid_value("interval", "must be greater than 0"));
        }

        let connector = self.start()?;
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(interval_secs = interval.as_secs(), "Watching for new messages");

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match connector.sync_from_checkpoint().await {
                        Ok(report) => self.output_message(&json!({
                            "type": "SYNC_REPORT",
                            "report": report.to_json(),
                        })),
                        // Already reported by the engine
                        Err(e) => error!("Sync failed, retrying next interval: {e}"),
                    }
                }
                _ = &mut shutdown => {
                    info!("Interrupted, shutting down");
                    break;
                }
            }
        }

        connector.close().await
    }

    /// Output a result message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
