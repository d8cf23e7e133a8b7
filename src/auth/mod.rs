//! Authentication module
//!
//! Exchanges the connector's client credentials for a short-lived bearer
//! token using the OAuth2 client-credentials grant.
//!
//! Tokens are never cached across syncs: every sync performs exactly one
//! exchange and drops the token when it finishes.

mod exchanger;
mod types;

pub use exchanger::TokenExchanger;
pub use types::AccessToken;
