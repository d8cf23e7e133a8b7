//! Downstream message sinks

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Destination for validated messages
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Hand over one message payload, tagged with its device id
    async fn deliver(&self, device_id: &str, payload: &Value) -> Result<()>;

    /// Flush buffered output
    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// A delivered message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Delivery {
    /// Source device id
    pub device_id: String,
    /// Message payload, unmodified
    pub payload: Value,
}

/// Writes one JSON line per message
pub struct JsonLinesSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonLinesSink {
    /// Write to any writer
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// Write to stdout
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// Append to a file, creating it if needed
    pub fn append_to(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self::new(std::io::BufWriter::new(file)))
    }

    fn write_line(&self, line: &[u8]) -> std::io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| std::io::Error::other("sink writer poisoned"))?;
        writer.write_all(line)?;
        writer.write_all(b"\n")
    }
}

#[async_trait]
impl MessageSink for JsonLinesSink {
    async fn deliver(&self, device_id: &str, payload: &Value) -> Result<()> {
        let line = serde_json::to_vec(&serde_json::json!({
            "device_id": device_id,
            "payload": payload,
        }))?;
        self.write_line(&line)
            .map_err(|e| Error::delivery(device_id, e.to_string()))
    }

    async fn flush(&self) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| Error::Other("sink writer poisoned".to_string()))?;
        writer.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for JsonLinesSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesSink").finish_non_exhaustive()
    }
}

/// Forwards messages into a tokio channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Delivery>,
}

impl ChannelSink {
    /// Create a sink and the receiving end of its channel
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Delivery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl MessageSink for ChannelSink {
    async fn deliver(&self, device_id: &str, payload: &Value) -> Result<()> {
        self.tx
            .send(Delivery {
                device_id: device_id.to_string(),
                payload: payload.clone(),
            })
            .map_err(|_| Error::delivery(device_id, "receiver dropped"))
    }
}
