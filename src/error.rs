//! Error types
//!
//! Every fallible operation in the crate returns [`Error`]. Errors are handed
//! back to the caller untouched; nothing in the library logs or retries them.

use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use thiserror::Error as ThisError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid client configuration: {0}")]
    Config(String),

    #[error("{operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{operation}: failed to decode response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{operation}: {error}")]
    Api {
        operation: &'static str,
        error: ApiError,
    },
}

impl Error {
    /// The structured server error, if the server rejected the request.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.api_error()
            .map(|e| e.code == ErrorCode::NotFound)
            .unwrap_or(false)
    }
}

/// A non-2xx response from the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{} ({})", self.code, self.status.as_u16())
        } else {
            write!(f, "{} ({}): {}", self.code, self.status.as_u16(), self.message)
        }
    }
}

impl std::error::Error for ApiError {}

/// Machine-readable error code from the `code` field of an error body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    NotFound,
    Unauthorized,
    Forbidden,
    Unprocessable,
    Conflict,
    Internal,
    Other(String),
}

impl ErrorCode {
    pub fn from_code(code: &str) -> Self {
        match code {
            "not_found" => Self::NotFound,
            "unauthorized" => Self::Unauthorized,
            "forbidden" => Self::Forbidden,
            "unprocessable" | "unprocessable_entity" => Self::Unprocessable,
            "conflict" => Self::Conflict,
            "internal" | "internal_server_error" => Self::Internal,
            other => Self::Other(other.to_string()),
        }
    }

    /// Fallback used when the body carries no usable `code`.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::FORBIDDEN => Self::Forbidden,
            StatusCode::UNPROCESSABLE_ENTITY => Self::Unprocessable,
            StatusCode::CONFLICT => Self::Conflict,
            s if s.is_server_error() => Self::Internal,
            s => Self::Other(s.as_u16().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::Unprocessable => "unprocessable",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire shape of an error body.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_from_code() {
        assert_eq!(ErrorCode::from_code("not_found"), ErrorCode::NotFound);
        assert_eq!(ErrorCode::from_code("unauthorized"), ErrorCode::Unauthorized);
        assert_eq!(
            ErrorCode::from_code("rate_limited"),
            ErrorCode::Other("rate_limited".to_string())
        );
    }

    #[test]
    fn test_error_code_from_status() {
        assert_eq!(ErrorCode::from_status(StatusCode::NOT_FOUND), ErrorCode::NotFound);
        assert_eq!(
            ErrorCode::from_status(StatusCode::BAD_GATEWAY),
            ErrorCode::Internal
        );
        assert_eq!(
            ErrorCode::from_status(StatusCode::IM_A_TEAPOT),
            ErrorCode::Other("418".to_string())
        );
    }

    #[test]
    fn test_is_not_found() {
        let err = Error::Api {
            operation: "get deploy request",
            error: ApiError {
                status: StatusCode::NOT_FOUND,
                code: ErrorCode::NotFound,
                message: "Not Found".to_string(),
            },
        };
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "get deploy request: not_found (404): Not Found"
        );

        let err = Error::Config("missing base URL".to_string());
        assert!(!err.is_not_found());
        assert!(err.api_error().is_none());
    }
}
