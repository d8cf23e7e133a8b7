//! OAuth2 client-credentials token exchange

use super::types::{AccessToken, TokenResponse};
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use tracing::{debug, info};

/// Exchanges client credentials for an access token
#[derive(Debug, Clone)]
pub struct TokenExchanger {
    /// Token endpoint URL
    token_url: String,
    /// HTTP client for token requests
    http_client: HttpClient,
}

impl TokenExchanger {
    /// Create an exchanger for the given token endpoint
    pub fn new(token_url: impl Into<String>, http_client: HttpClient) -> Self {
        Self {
            token_url: token_url.into(),
            http_client,
        }
    }

    /// Token endpoint URL
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Perform a single token exchange
    ///
    /// POSTs `grant_type=client_credentials` with the client id and secret as
    /// HTTP Basic credentials. Every failure (transport, non-200, `error` in
    /// the body, missing or empty `access_token`) is an [`Error::Auth`].
    pub async fn exchange(&self, credentials: &Credentials) -> Result<AccessToken> {
        debug!(
            token_url = %self.token_url,
            client_id = %credentials.client_id,
            "Requesting access token"
        );

        let body = self
            .http_client
            .post_form_basic(
                &self.token_url,
                &[("grant_type", "client_credentials")],
                &credentials.client_id,
                &credentials.client_secret,
            )
            .await
            .map_err(|e| Error::auth(e.to_string()))?;

        let response: TokenResponse = serde_json::from_value(body)
            .map_err(|e| Error::auth(format!("Malformed token response: {e}")))?;

        let token = response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::auth("Invalid Credentials. No access token was received."))?;

        info!("Access token acquired");
        Ok(AccessToken::new(token))
    }
}
