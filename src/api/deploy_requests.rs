//! Deploy Requests
//!
//! A deploy request proposes applying one branch's schema to another branch.
//! The server owns its lifecycle (open, approved, deploying, complete, closed);
//! the client only reports the snapshot returned by each call.

use super::http::HttpClient;
use super::paths::{deploy_request_action_api_path, deploy_request_api_path, deploy_requests_api_path};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A deploy request as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployRequest {
    pub id: String,

    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub into_branch: String,

    pub number: u64,

    #[serde(default)]
    pub deployability_errors: String,
    #[serde(default)]
    pub deployment_state: String,

    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub deployed: bool,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

/// Decision attached to a review
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewState {
    Approved,
    Commented,
    RequestedChanges,
    /// A state this client does not know about yet, kept verbatim
    Other(String),
}

impl ReviewState {
    pub fn from_state(state: &str) -> Self {
        match state {
            "approved" => Self::Approved,
            "commented" => Self::Commented,
            "requested_changes" => Self::RequestedChanges,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Approved => "approved",
            Self::Commented => "commented",
            Self::RequestedChanges => "requested_changes",
            Self::Other(state) => state,
        }
    }
}

impl std::fmt::Display for ReviewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ReviewState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReviewState {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let state = String::deserialize(deserializer)?;
        Ok(Self::from_state(&state))
    }
}

/// A review posted on a deploy request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployRequestReview {
    pub id: String,
    #[serde(default)]
    pub body: String,
    pub state: ReviewState,
}

/// Lists the deploy requests of a database
#[derive(Debug, Clone, Default)]
pub struct ListDeployRequestsRequest {
    pub organization: String,
    pub database: String,
}

/// Opens a deploy request from `branch` into `into_branch`
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateDeployRequestRequest {
    #[serde(skip)]
    pub organization: String,
    #[serde(skip)]
    pub database: String,
    pub branch: String,
    pub into_branch: String,
    pub notes: String,
}

/// Fetches a single deploy request by number
#[derive(Debug, Clone, Default)]
pub struct GetDeployRequestRequest {
    pub organization: String,
    pub database: String,
    pub number: u64,
}

/// Approves and executes a deploy request.
/// Named this way because `DeployRequest` is the data model.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PerformDeployRequest {
    #[serde(skip)]
    pub organization: String,
    #[serde(skip)]
    pub database: String,
    #[serde(skip)]
    pub number: u64,
}

/// Cancels a queued or running deploy
#[derive(Debug, Clone, Default, Serialize)]
pub struct CancelDeployRequest {
    #[serde(skip)]
    pub organization: String,
    #[serde(skip)]
    pub database: String,
    #[serde(skip)]
    pub number: u64,
}

/// Closes a deploy request without deploying it
#[derive(Debug, Clone, Default)]
pub struct CloseDeployRequestRequest {
    pub organization: String,
    pub database: String,
    pub number: u64,
}

/// Posts a review on a deploy request
#[derive(Debug, Clone, Serialize)]
pub struct ReviewDeployRequestRequest {
    #[serde(skip)]
    pub organization: String,
    #[serde(skip)]
    pub database: String,
    #[serde(skip)]
    pub number: u64,
    pub body: String,
    pub state: ReviewState,
}

/// Body of the close call
#[derive(Debug, Serialize)]
struct CloseRequest {
    state: &'static str,
}

/// List envelope
#[derive(Debug, Deserialize)]
struct DeployRequestsResponse {
    #[serde(default)]
    data: Vec<DeployRequest>,
}

/// Operations on the deploy requests API
#[async_trait]
pub trait DeployRequestsService: Send + Sync {
    async fn list(&self, req: &ListDeployRequestsRequest) -> Result<Vec<DeployRequest>>;
    async fn create(&self, req: &CreateDeployRequestRequest) -> Result<DeployRequest>;
    async fn get(&self, req: &GetDeployRequestRequest) -> Result<DeployRequest>;
    async fn deploy(&self, req: &PerformDeployRequest) -> Result<DeployRequest>;
    async fn cancel_deploy(&self, req: &CancelDeployRequest) -> Result<DeployRequest>;
    async fn close(&self, req: &CloseDeployRequestRequest) -> Result<DeployRequest>;
    async fn create_review(&self, req: &ReviewDeployRequestRequest) -> Result<DeployRequestReview>;
}

/// [`DeployRequestsService`] backed by the HTTP transport
#[derive(Debug, Clone)]
pub struct DeployRequestsClient {
    http: HttpClient,
}

impl DeployRequestsClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl DeployRequestsService for DeployRequestsClient {
    async fn list(&self, req: &ListDeployRequestsRequest) -> Result<Vec<DeployRequest>> {
        let path = deploy_requests_api_path(&req.organization, &req.database);
        let response: DeployRequestsResponse = self.http.get("list deploy requests", &path).await?;
        Ok(response.data)
    }

    async fn create(&self, req: &CreateDeployRequestRequest) -> Result<DeployRequest> {
        let path = deploy_requests_api_path(&req.organization, &req.database);
        self.http.post("create deploy request", &path, Some(req)).await
    }

    async fn get(&self, req: &GetDeployRequestRequest) -> Result<DeployRequest> {
        let path = deploy_request_api_path(&req.organization, &req.database, req.number);
        self.http.get("get deploy request", &path).await
    }

    async fn deploy(&self, req: &PerformDeployRequest) -> Result<DeployRequest> {
        let path = deploy_request_action_api_path(&req.organization, &req.database, req.number, "deploy");
        self.http.post("deploy deploy request", &path, Some(req)).await
    }

    async fn cancel_deploy(&self, req: &CancelDeployRequest) -> Result<DeployRequest> {
        let path = deploy_request_action_api_path(&req.organization, &req.database, req.number, "cancel");
        self.http.post("cancel deploy request", &path, Some(req)).await
    }

    async fn close(&self, req: &CloseDeployRequestRequest) -> Result<DeployRequest> {
        let path = deploy_request_api_path(&req.organization, &req.database, req.number);
        self.http
            .patch("close deploy request", &path, &CloseRequest { state: "closed" })
            .await
    }

    async fn create_review(&self, req: &ReviewDeployRequestRequest) -> Result<DeployRequestReview> {
        let path = deploy_request_action_api_path(&req.organization, &req.database, req.number, "reviews");
        self.http.post("review deploy request", &path, Some(req)).await
    }
}
