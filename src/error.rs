//! Error types for artik-sync
//!
//! This module defines the error hierarchy for the whole connector.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// Pipeline stage an error is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    /// Loading or validating configuration
    Config,
    /// OAuth2 token exchange
    Auth,
    /// Device enumeration
    DeviceList,
    /// Per-device message fetch
    MessageFetch,
    /// Per-message validation and forwarding
    Forward,
    /// Checkpoint persistence
    Checkpoint,
    /// Anything outside the pipeline
    Runtime,
}

impl std::fmt::Display for SyncStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Config => "config",
            Self::Auth => "auth",
            Self::DeviceList => "device_list",
            Self::MessageFetch => "message_fetch",
            Self::Forward => "forward",
            Self::Checkpoint => "checkpoint",
            Self::Runtime => "runtime",
        };
        f.write_str(name)
    }
}

/// The main error type for artik-sync
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Sync Stage Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Device listing failed: {message}")]
    DeviceList { message: String },

    #[error("Message fetch failed for device {device_id}: {message}")]
    MessageFetch { device_id: String, message: String },

    #[error("Device {sdid} is not registered.")]
    NotRegistered { sdid: String },

    #[error("Registry lookup failed for device {device_id}: {message}")]
    Registry { device_id: String, message: String },

    #[error("Delivery failed for device {device_id}: {message}")]
    Delivery { device_id: String, message: String },

    #[error("Failed to flush message sink: {message}")]
    SinkFlush { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("API error: {message}")]
    Api { message: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // State Errors
    // ============================================================================
    #[error("State error: {message}")]
    State { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Runtime Errors
    // ============================================================================
    #[error("A sync is already in progress")]
    SyncInProgress,

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a device list error
    pub fn device_list(message: impl Into<String>) -> Self {
        Self::DeviceList {
            message: message.into(),
        }
    }

    /// Create a message fetch error
    pub fn message_fetch(device_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MessageFetch {
            device_id: device_id.into(),
            message: message.into(),
        }
    }

    /// Create a not-registered error
    pub fn not_registered(sdid: impl Into<String>) -> Self {
        Self::NotRegistered { sdid: sdid.into() }
    }

    /// Create a registry lookup error
    pub fn registry(device_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Registry {
            device_id: device_id.into(),
            message: message.into(),
        }
    }

    /// Create a delivery error
    pub fn delivery(device_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Delivery {
            device_id: device_id.into(),
            message: message.into(),
        }
    }

    /// Create a sink flush error
    pub fn sink_flush(message: impl Into<String>) -> Self {
        Self::SinkFlush {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create an API error (error field in a response body)
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Whether this error aborts the sync it occurred in
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::NotRegistered { .. }
                | Error::Registry { .. }
                | Error::Delivery { .. }
                | Error::SyncInProgress
        )
    }

    /// Stage this error belongs to
    pub fn stage(&self) -> SyncStage {
        match self {
            Error::Config { .. }
            | Error::MissingConfigField { .. }
            | Error::InvalidConfigValue { .. }
            | Error::YamlParse(_)
            | Error::InvalidUrl(_) => SyncStage::Config,
            Error::Auth { .. } => SyncStage::Auth,
            Error::DeviceList { .. } => SyncStage::DeviceList,
            Error::MessageFetch { .. } => SyncStage::MessageFetch,
            Error::NotRegistered { .. }
            | Error::Registry { .. }
            | Error::Delivery { .. }
            | Error::SinkFlush { .. } => SyncStage::Forward,
            Error::State { .. } | Error::Io(_) => SyncStage::Checkpoint,
            _ => SyncStage::Runtime,
        }
    }
}

/// Result type alias for artik-sync
pub type Result<T> = std::result::Result<T, Error>;
