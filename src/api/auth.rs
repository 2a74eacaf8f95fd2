//! PlanetScale Authentication
//!
//! Credentials are rendered into the `Authorization` header by the transport.
//! Two forms are supported: OAuth/personal access tokens and service tokens.

use reqwest::header::HeaderValue;
use std::fmt;

use crate::error::{Error, Result};

/// Environment variable holding an access token
pub const ENV_ACCESS_TOKEN: &str = "PLANETSCALE_TOKEN";
/// Environment variable holding a service token id
pub const ENV_SERVICE_TOKEN_ID: &str = "PLANETSCALE_SERVICE_TOKEN_ID";
/// Environment variable holding a service token secret
pub const ENV_SERVICE_TOKEN: &str = "PLANETSCALE_SERVICE_TOKEN";

/// Credentials used to authenticate API calls
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Sent as `Authorization: Bearer <token>`
    AccessToken(String),
    /// Sent as `Authorization: <id>:<token>`
    ServiceToken { id: String, token: String },
}

impl Credentials {
    pub fn access_token(token: impl Into<String>) -> Self {
        Self::AccessToken(token.into())
    }

    pub fn service_token(id: impl Into<String>, token: impl Into<String>) -> Self {
        Self::ServiceToken {
            id: id.into(),
            token: token.into(),
        }
    }

    /// Build the `Authorization` header value
    /// Security: the value is marked sensitive so it never shows up in debug output
    pub fn header_value(&self) -> Result<HeaderValue> {
        let raw = match self {
            Credentials::AccessToken(token) => {
                if token.is_empty() {
                    return Err(Error::Config("access token is empty".to_string()));
                }
                format!("Bearer {}", token)
            }
            Credentials::ServiceToken { id, token } => {
                if id.is_empty() || token.is_empty() {
                    return Err(Error::Config(
                        "service token id and token must both be set".to_string(),
                    ));
                }
                format!("{}:{}", id, token)
            }
        };

        let mut value = HeaderValue::from_str(&raw)
            .map_err(|_| Error::Config("credentials contain invalid header characters".to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Resolve credentials from the environment.
    /// A service token takes precedence over an access token when both are set.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let (Some(id), Some(token)) = (non_empty(ENV_SERVICE_TOKEN_ID), non_empty(ENV_SERVICE_TOKEN)) {
            return Some(Self::service_token(id.trim(), token.trim()));
        }

        if non_empty(ENV_SERVICE_TOKEN_ID).is_some() {
            tracing::warn!("{} is set without {}", ENV_SERVICE_TOKEN_ID, ENV_SERVICE_TOKEN);
        }

        non_empty(ENV_ACCESS_TOKEN).map(|t| Self::access_token(t.trim()))
    }
}

// Security: never print secrets
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::AccessToken(_) => f.write_str("AccessToken(***)"),
            Credentials::ServiceToken { id, .. } => {
                f.debug_struct("ServiceToken").field("id", id).field("token", &"***").finish()
            }
        }
    }
}
