//! Auth token types

use serde::Deserialize;

/// Bearer token obtained from the token endpoint
///
/// Owned by a single sync invocation, so its expiry is never consulted.
#[derive(Clone)]
pub struct AccessToken {
    /// The access token
    token: String,
}

impl AccessToken {
    /// Create a new token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Raw token value for the `Authorization: Bearer` header
    pub fn secret(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"***")
            .finish()
    }
}

/// OAuth2 token response
///
/// Only `access_token` is read; `expires_in`, `token_type` and any other
/// fields are ignored whatever their type.
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

#[cfg(test)]
mod type_tests {
    use super::*;

    #[test]
    fn test_token_secret() {
        let token = AccessToken::new("test");
        assert_eq!(token.secret(), "test");
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AccessToken::new("super-secret");
        assert!(!format!("{token:?}").contains("super-secret"));
    }
}
