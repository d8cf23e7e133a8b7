//! Device registry lookup

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Registration metadata for a device
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRecord {
    /// Device id
    pub id: String,
    /// Whatever the registry holds about the device
    pub metadata: Value,
}

impl DeviceRecord {
    /// Create a record with no metadata
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            metadata: Value::Null,
        }
    }
}

/// Registry of devices known to the receiving platform
#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    /// Look up a device; `Ok(None)` means the device is not registered
    async fn lookup(&self, device_id: &str) -> Result<Option<DeviceRecord>>;
}

/// In-memory registry
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    devices: HashMap<String, DeviceRecord>,
}

impl StaticRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry containing the given ids
    pub fn with_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        for id in ids {
            registry.insert(DeviceRecord::new(id));
        }
        registry
    }

    /// Add or replace a device
    pub fn insert(&mut self, record: DeviceRecord) {
        self.devices.insert(record.id.clone(), record);
    }

    /// Number of registered devices
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Parse a JSON array of ids or of records carrying `id` (or `_id`)
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<Value> = serde_json::from_str(json)?;
        let mut registry = Self::new();

        for entry in entries {
            let id = match &entry {
                Value::String(s) => s.clone(),
                Value::Object(map) => map
                    .get("id")
                    .or_else(|| map.get("_id"))
                    .and_then(Value::as_str)
                    .ok_or_else(|| Error::config(format!("Registry entry has no id: {entry}")))?
                    .to_string(),
                other => {
                    return Err(Error::config(format!(
                        "Registry entries must be strings or objects, got: {other}"
                    )))
                }
            };
            registry.insert(DeviceRecord {
                id,
                metadata: entry,
            });
        }

        Ok(registry)
    }

    /// Load a registry file (see [`StaticRegistry::from_json`])
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read registry {}: {e}", path.display()))
        })?;
        Self::from_json(&contents)
    }
}

#[async_trait]
impl DeviceRegistry for StaticRegistry {
    async fn lookup(&self, device_id: &str) -> Result<Option<DeviceRecord>> {
        Ok(self.devices.get(device_id).cloned())
    }
}

/// Registry that accepts every device
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllRegistry;

#[async_trait]
impl DeviceRegistry for AllowAllRegistry {
    async fn lookup(&self, device_id: &str) -> Result<Option<DeviceRecord>> {
        Ok(Some(DeviceRecord::new(device_id)))
    }
}
