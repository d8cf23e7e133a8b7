//! Configuration for the connector
//!
//! The configuration is supplied once at startup (file, inline JSON or
//! environment) and is immutable for the lifetime of the process.

use crate::error::{Error, Result};
use crate::types::Timestamp;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default OAuth2 token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.artik.cloud/token";

/// Default REST API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.artik.cloud/v1.1";

/// Fixed page size used by the device listing and message endpoints
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Environment variable overriding `client_id`
pub const ENV_CLIENT_ID: &str = "ARTIK_CLIENT_ID";
/// Environment variable overriding `client_secret`
pub const ENV_CLIENT_SECRET: &str = "ARTIK_CLIENT_SECRET";
/// Environment variable overriding `account_id`
pub const ENV_ACCOUNT_ID: &str = "ARTIK_ACCOUNT_ID";

// ============================================================================
// Connector Config
// ============================================================================

/// Complete connector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// OAuth2 client id
    #[serde(default)]
    pub client_id: String,

    /// OAuth2 client secret
    #[serde(default)]
    pub client_secret: String,

    /// Account whose devices are synced
    #[serde(default, alias = "user_id", alias = "userId")]
    pub account_id: String,

    /// Token endpoint
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// REST API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Window start used when no checkpoint exists (ms since epoch)
    #[serde(default)]
    pub default_start_time: Timestamp,

    /// Devices per listing page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Messages fetched per device per sync
    #[serde(default = "default_page_size")]
    pub message_count: u32,

    /// Number of device message fetches allowed in flight
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpSettings,
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_fetch_concurrency() -> usize {
    1
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            account_id: String::new(),
            token_url: default_token_url(),
            api_base_url: default_api_base_url(),
            default_start_time: 0,
            page_size: DEFAULT_PAGE_SIZE,
            message_count: DEFAULT_PAGE_SIZE,
            fetch_concurrency: 1,
            http: HttpSettings::default(),
        }
    }
}

impl ConnectorConfig {
    /// Create a config with credentials and default endpoints
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            account_id: account_id.into(),
            ..Default::default()
        }
    }

    /// Load config from a JSON or YAML file (chosen by extension)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Ok(serde_yaml::from_str(&contents)?),
            _ => Ok(serde_json::from_str(&contents)?),
        }
    }

    /// Parse config from an inline JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Point both endpoints at a single base (used against mock servers)
    #[must_use]
    pub fn with_endpoints(
        mut self,
        token_url: impl Into<String>,
        api_base_url: impl Into<String>,
    ) -> Self {
        self.token_url = token_url.into();
        self.api_base_url = api_base_url.into();
        self
    }

    /// Set the default window start
    #[must_use]
    pub fn with_default_start_time(mut self, start: Timestamp) -> Self {
        self.default_start_time = start;
        self
    }

    /// Set fetch concurrency
    #[must_use]
    pub fn with_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.fetch_concurrency = concurrency;
        self
    }

    /// Override credentials from `ARTIK_*` environment variables when set
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup(ENV_CLIENT_ID) {
            self.client_id = v;
        }
        if let Some(v) = lookup(ENV_CLIENT_SECRET) {
            self.client_secret = v;
        }
        if let Some(v) = lookup(ENV_ACCOUNT_ID) {
            self.account_id = v;
        }
        self
    }

    /// Check required fields and value ranges
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("account_id", &self.account_id),
        ] {
            if value.trim().is_empty() {
                return Err(Error::missing_field(field));
            }
        }

        for (field, value) in [
            ("token_url", &self.token_url),
            ("api_base_url", &self.api_base_url),
        ] {
            Url::parse(value).map_err(|e| Error::invalid_value(field, e.to_string()))?;
        }

        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be greater than 0"));
        }
        if self.message_count == 0 {
            return Err(Error::invalid_value(
                "message_count",
                "must be greater than 0",
            ));
        }
        if self.fetch_concurrency == 0 {
            return Err(Error::invalid_value(
                "fetch_concurrency",
                "must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Credentials used for the token exchange
    pub fn credentials(&self) -> Credentials {
        Credentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            account_id: self.account_id.clone(),
        }
    }
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// HTTP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Optional request rate cap
    #[serde(default)]
    pub requests_per_second: Option<u32>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            requests_per_second: None,
        }
    }
}

impl HttpSettings {
    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Client credentials, fixed at startup
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// OAuth2 client id
    pub client_id: String,
    /// OAuth2 client secret
    pub client_secret: String,
    /// Account whose devices are synced
    pub account_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("account_id", &self.account_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_config_defaults() {
        let config = ConnectorConfig::from_json(
            r#"{"client_id": "id", "client_secret": "secret", "account_id": "acct"}"#,
        )
        .unwrap();

        assert_eq!(config.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.page_size, 100);
        assert_eq!(config.message_count, 100);
        assert_eq!(config.fetch_concurrency, 1);
        assert_eq!(config.default_start_time, 0);
        assert_eq!(config.http.timeout(), Duration::from_secs(30));
        assert!(config.http.requests_per_second.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_user_id_alias() {
        let config = ConnectorConfig::from_json(
            r#"{"clientId": "x", "client_id": "id", "client_secret": "s", "userId": "u1"}"#,
        )
        .unwrap();
        assert_eq!(config.account_id, "u1");
    }

    #[test]
    fn test_config_missing_credentials() {
        let config = ConnectorConfig::new("id", "", "acct");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "client_secret"));
    }

    #[test]
    fn test_config_invalid_url() {
        let config = ConnectorConfig::new("id", "secret", "acct")
            .with_endpoints("not a url", "http://localhost");
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "token_url")
        );
    }

    #[test]
    fn test_config_zero_concurrency() {
        let config = ConnectorConfig::new("id", "secret", "acct").with_fetch_concurrency(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(
            file,
            r"client_id: id
client_secret: secret
account_id: acct
fetch_concurrency: 4
http:
  timeout_secs: 5
  requests_per_second: 20
"
        )
        .unwrap();

        let config = ConnectorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.account_id, "acct");
        assert_eq!(config.fetch_concurrency, 4);
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.requests_per_second, Some(20));
    }

    #[test]
    fn test_config_file_not_found() {
        let err = ConnectorConfig::from_file("/nonexistent/config.json").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> =
            [(ENV_CLIENT_ID, "env-id"), (ENV_ACCOUNT_ID, "env-acct")].into();
        let config = ConnectorConfig::new("id", "secret", "acct")
            .with_overrides(|key| env.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.client_id, "env-id");
        assert_eq!(config.client_secret, "secret");
        assert_eq!(config.account_id, "env-acct");
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = ConnectorConfig::new("id", "top-secret", "acct").credentials();
        let debug = format!("{creds:?}");
        assert!(!debug.contains("top-secret"));
        assert!(debug.contains("id"));
    }
}
