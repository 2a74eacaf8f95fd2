//! PlanetScale Client
//!
//! Main client for the PlanetScale API, combining the HTTP transport with
//! one service per resource type.

use super::auth::Credentials;
use super::deploy_requests::DeployRequestsClient;
use super::http::{HttpClient, HttpConfig};
use super::passwords::PasswordsClient;
use crate::error::{Error, Result};
use std::time::Duration;
use url::Url;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.planetscale.com/";

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("planetscale-rs/", env!("CARGO_PKG_VERSION"));

/// Main PlanetScale client
///
/// Cheap to clone; every service shares the same underlying connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    pub http: HttpClient,
    pub deploy_requests: DeployRequestsClient,
    pub passwords: PasswordsClient,
}

impl Client {
    /// Create a client against the default endpoint
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::builder().credentials(credentials).build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    fn from_http(http: HttpClient) -> Self {
        Self {
            deploy_requests: DeployRequestsClient::new(http.clone()),
            passwords: PasswordsClient::new(http.clone()),
            http,
        }
    }
}

/// Builder for [`Client`]
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    credentials: Option<Credentials>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Override the API endpoint, e.g. to point at a mock server
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn access_token(self, token: impl Into<String>) -> Self {
        self.credentials(Credentials::access_token(token))
    }

    pub fn service_token(self, id: impl Into<String>, token: impl Into<String>) -> Self {
        self.credentials(Credentials::service_token(id, token))
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Per-request timeout; unset means no timeout beyond reqwest's own
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client. Fails before any network I/O on bad configuration.
    pub fn build(self) -> Result<Client> {
        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let base_url = Url::parse(raw)
            .map_err(|e| Error::Config(format!("invalid base URL {:?}: {}", raw, e)))?;

        let http = HttpClient::new(HttpConfig {
            base_url,
            credentials: self.credentials,
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout: self.timeout,
        })?;

        Ok(Client::from_http(http))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let client = Client::new(Credentials::access_token("tok")).unwrap();
        assert_eq!(client.http.base_url().as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let err = Client::builder().base_url("not a url").build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_credentials_fail_at_build() {
        let err = Client::builder().access_token("").build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_user_agent_mentions_crate() {
        assert!(DEFAULT_USER_AGENT.starts_with("planetscale-rs/"));
    }
}
