//! HTTP client for the cloud REST API
//!
//! A thin layer over `reqwest` that handles:
//! - Request timeout and user agent
//! - Optional client-side rate limiting
//! - Response classification (transport, `error` body field, status)
//!
//! Each request is attempted exactly once; there is no retry or backoff.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::config::HttpSettings;
use crate::error::{Error, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            rate_limit: None,
            user_agent: format!("artik-sync/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Build from the connector's HTTP settings
    pub fn from_settings(settings: &HttpSettings) -> Self {
        Self {
            timeout: settings.timeout(),
            rate_limit: settings
                .requests_per_second
                .map(|rps| RateLimiterConfig::new(rps, rps)),
            ..Default::default()
        }
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client shared by the token exchange and the API calls
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// GET a JSON document with bearer authentication
    pub async fn get_json<Q: Serialize + ?Sized>(
        &self,
        url: &str,
        query: &Q,
        bearer: &str,
    ) -> Result<Value> {
        let req = self.client.get(url).query(query).bearer_auth(bearer);
        self.send(req).await
    }

    /// POST a form with HTTP Basic authentication and parse the JSON reply
    pub async fn post_form_basic(
        &self,
        url: &str,
        form: &[(&str, &str)],
        username: &str,
        password: &str,
    ) -> Result<Value> {
        let req = self
            .client
            .post(url)
            .basic_auth(username, Some(password))
            .form(form);
        self.send(req).await
    }

    async fn send(&self, req: RequestBuilder) -> Result<Value> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let response = req.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let text = response.text().await?;

        debug!(%url, status = status.as_u16(), bytes = text.len(), "Response received");
        classify_response(status, &text)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Turn a status and body into a JSON document or an error
///
/// An `error` field in the body wins over the status code so the provider's
/// message is kept. Any other non-200 status is an `HttpStatus` error.
pub fn classify_response(status: StatusCode, body: &str) -> Result<Value> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    if let Some(message) = parsed.as_ref().and_then(error_message) {
        return Err(Error::api(message));
    }

    if status != StatusCode::OK {
        return Err(Error::http_status(status.as_u16(), body));
    }

    parsed.ok_or_else(|| Error::decode("Response body is not valid JSON"))
}

/// Extract the provider error message from a response body, if any
///
/// Accepts both `{"error": {"message": "..."}}` and `{"error": "..."}`.
pub fn error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => Some(match map.get("message") {
            Some(Value::String(s)) => s.clone(),
            _ => Value::Object(map.clone()).to_string(),
        }),
        other => Some(other.to_string()),
    }
}
