//! HTTP transport for PlanetScale REST API calls

use super::auth::Credentials;
use crate::error::{ApiError, Error, ErrorBody, ErrorCode, Result};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Maximum length of a raw error body kept in an error message
const MAX_ERROR_BODY_LENGTH: usize = 200;

/// Sanitize a non-JSON error body before putting it into an error message
/// Truncates long responses and strips control characters
fn sanitize_body(body: &str) -> String {
    let truncated = if body.len() > MAX_ERROR_BODY_LENGTH {
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// Settings the transport is built from. Read-only once the client exists.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub base_url: Url,
    pub credentials: Option<Credentials>,
    pub user_agent: String,
    pub timeout: Option<Duration>,
}

/// HTTP client wrapper shared by every resource service
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(config: HttpConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(credentials) = &config.credentials {
            headers.insert(header::AUTHORIZATION, credentials.header_value()?);
        }

        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: normalize_base_url(config.base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path against the base URL
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Make a GET request and decode the JSON response
    pub async fn get<T: DeserializeOwned>(&self, operation: &'static str, path: &str) -> Result<T> {
        let request = self.request(Method::GET, path)?;
        let body = self.send(operation, request).await?;
        decode(operation, &body)
    }

    /// Make a POST request with an optional JSON body and decode the JSON response
    pub async fn post<B, T>(&self, operation: &'static str, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.request(Method::POST, path)?;
        if let Some(body) = body {
            request = request.json(body);
        }
        let body = self.send(operation, request).await?;
        decode(operation, &body)
    }

    /// Make a PATCH request with a JSON body and decode the JSON response
    pub async fn patch<B, T>(&self, operation: &'static str, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PATCH, path)?.json(body);
        let body = self.send(operation, request).await?;
        decode(operation, &body)
    }

    /// Make a DELETE request. Any response body is ignored.
    pub async fn delete(&self, operation: &'static str, path: &str) -> Result<()> {
        let request = self.request(Method::DELETE, path)?;
        self.send(operation, request).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path)?;
        tracing::debug!("{} {}", method, url.path());
        Ok(self.client.request(method, url))
    }

    /// Send a request and return the body of a successful response
    async fn send(&self, operation: &'static str, request: RequestBuilder) -> Result<String> {
        let response = request
            .send()
            .await
            .map_err(|source| Error::Transport { operation, source })?;

        let status = response.status();
        tracing::trace!("{} -> {}", operation, status);

        let body = response
            .text()
            .await
            .map_err(|source| Error::Transport { operation, source })?;

        if !status.is_success() {
            return Err(Error::Api {
                operation,
                error: api_error(status, &body),
            });
        }

        Ok(body)
    }
}

/// `Url::join` drops the last path segment unless the base ends with a slash
fn normalize_base_url(mut url: Url) -> Result<Url> {
    if url.cannot_be_a_base() {
        return Err(Error::Config(format!("base URL {} cannot be a base", url)));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn decode<T: DeserializeOwned>(operation: &'static str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|source| Error::Decode { operation, source })
}

/// Build an [`ApiError`] from a failed response
fn api_error(status: StatusCode, body: &str) -> ApiError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => ApiError {
            status,
            code: parsed
                .code
                .as_deref()
                .map(ErrorCode::from_code)
                .unwrap_or_else(|| ErrorCode::from_status(status)),
            message: parsed.message.unwrap_or_default(),
        },
        Err(_) => ApiError {
            status,
            code: ErrorCode::from_status(status),
            message: sanitize_body(body.trim()),
        },
    }
}

/// Format an API error for display
/// Security: avoids echoing raw server bodies back to the terminal
pub fn format_api_error(error: &Error) -> String {
    match error {
        Error::Api { error, .. } => match error.status {
            StatusCode::UNAUTHORIZED => {
                "Authentication failed. Check PLANETSCALE_TOKEN or your service token.".to_string()
            }
            StatusCode::FORBIDDEN => {
                "Permission denied. Check the token's access to this organization.".to_string()
            }
            StatusCode::NOT_FOUND => "Resource not found.".to_string(),
            StatusCode::TOO_MANY_REQUESTS => "Rate limit exceeded. Please try again later.".to_string(),
            StatusCode::CONFLICT => {
                "Resource conflict. The resource may already exist or be in use.".to_string()
            }
            s if s.is_server_error() => {
                "PlanetScale API temporarily unavailable. Please try again.".to_string()
            }
            _ if !error.message.is_empty() => truncate(&error.message, 120),
            _ => "Invalid request. Check your parameters.".to_string(),
        },
        Error::Transport { .. } => {
            "Request failed. Check your network connection and try again.".to_string()
        }
        other => truncate(&other.to_string(), 120),
    }
}

fn truncate(s: &str, max: usize) -> String {
    let cleaned: String = s.chars().filter(|c| !c.is_control()).collect();
    if cleaned.chars().count() > max {
        format!("{}...", cleaned.chars().take(max).collect::<String>())
    } else {
        cleaned
    }
}
