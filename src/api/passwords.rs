//! Branch Passwords
//!
//! Credentials scoped to a single database branch. The plaintext secret is
//! only present in the response to [`PasswordsService::create`]; callers must
//! store it right away.

use super::http::HttpClient;
use super::paths::{password_api_path, passwords_api_path};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A branch password as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseBranchPassword {
    #[serde(rename = "id")]
    pub public_id: String,
    #[serde(rename = "display_name", default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub role: String,
    /// `None` on every response except the one to a create call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Creates a password on a branch
#[derive(Debug, Clone, Default, Serialize)]
pub struct DatabaseBranchPasswordRequest {
    #[serde(skip)]
    pub organization: String,
    #[serde(skip)]
    pub database: String,
    #[serde(skip)]
    pub branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// e.g. `admin`, `writer`, `reader`; server default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListDatabaseBranchPasswordRequest {
    pub organization: String,
    pub database: String,
    pub branch: String,
}

#[derive(Debug, Clone, Default)]
pub struct GetDatabaseBranchPasswordRequest {
    pub organization: String,
    pub database: String,
    pub branch: String,
    pub password_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteDatabaseBranchPasswordRequest {
    pub organization: String,
    pub database: String,
    pub branch: String,
    pub password_id: String,
}

#[derive(Debug, Deserialize)]
struct PasswordsResponse {
    #[serde(default)]
    data: Vec<DatabaseBranchPassword>,
}

/// Operations on the branch passwords API
#[async_trait]
pub trait PasswordsService: Send + Sync {
    async fn create(&self, req: &DatabaseBranchPasswordRequest) -> Result<DatabaseBranchPassword>;
    async fn list(&self, req: &ListDatabaseBranchPasswordRequest) -> Result<Vec<DatabaseBranchPassword>>;
    async fn get(&self, req: &GetDatabaseBranchPasswordRequest) -> Result<DatabaseBranchPassword>;
    async fn delete(&self, req: &DeleteDatabaseBranchPasswordRequest) -> Result<()>;
}

/// [`PasswordsService`] backed by the HTTP transport
#[derive(Debug, Clone)]
pub struct PasswordsClient {
    http: HttpClient,
}

impl PasswordsClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl PasswordsService for PasswordsClient {
    async fn create(&self, req: &DatabaseBranchPasswordRequest) -> Result<DatabaseBranchPassword> {
        let path = passwords_api_path(&req.organization, &req.database, &req.branch);
        self.http.post("create branch password", &path, Some(req)).await
    }

    async fn list(&self, req: &ListDatabaseBranchPasswordRequest) -> Result<Vec<DatabaseBranchPassword>> {
        let path = passwords_api_path(&req.organization, &req.database, &req.branch);
        let response: PasswordsResponse = self.http.get("list branch passwords", &path).await?;
        Ok(response.data)
    }

    async fn get(&self, req: &GetDatabaseBranchPasswordRequest) -> Result<DatabaseBranchPassword> {
        let path = password_api_path(&req.organization, &req.database, &req.branch, &req.password_id);
        self.http.get("get branch password", &path).await
    }

    async fn delete(&self, req: &DeleteDatabaseBranchPasswordRequest) -> Result<()> {
        let path = password_api_path(&req.organization, &req.database, &req.branch, &req.password_id);
        self.http.delete("delete branch password", &path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decode_created_password() {
        let json = r#"{"id":"x","username":"x","role":"writer","plain_text":"secret","display_name":"x","created_at":"2021-01-14T10:19:23.000Z"}"#;
        let password: DatabaseBranchPassword = serde_json::from_str(json).unwrap();

        assert_eq!(
            password,
            DatabaseBranchPassword {
                public_id: "x".to_string(),
                name: "x".to_string(),
                username: "x".to_string(),
                role: "writer".to_string(),
                plain_text: Some("secret".to_string()),
                created_at: Utc.with_ymd_and_hms(2021, 1, 14, 10, 19, 23).unwrap(),
            }
        );
    }

    #[test]
    fn test_absent_plain_text_is_none() {
        let json = r#"{"id":"x","display_name":"x","created_at":"2021-01-14T10:19:23.000Z"}"#;
        let password: DatabaseBranchPassword = serde_json::from_str(json).unwrap();
        assert_eq!(password.plain_text, None);
        assert_eq!(password.role, "");

        let json = r#"{"id":"x","plain_text":"","created_at":"2021-01-14T10:19:23.000Z"}"#;
        let password: DatabaseBranchPassword = serde_json::from_str(json).unwrap();
        assert_eq!(password.plain_text, Some(String::new()));
    }

    #[test]
    fn test_create_body_omits_unset_fields() {
        let req = DatabaseBranchPasswordRequest {
            organization: "o".to_string(),
            database: "d".to_string(),
            branch: "b".to_string(),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&req).unwrap(), "{}");

        let req = DatabaseBranchPasswordRequest {
            role: Some("reader".to_string()),
            ..req
        };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"role":"reader"}"#);
    }
}
