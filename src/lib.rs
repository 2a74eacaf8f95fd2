//! Typed client for the PlanetScale management API.

pub mod api;
pub mod error;

pub use api::auth::Credentials;
pub use api::client::{Client, ClientBuilder};
pub use api::deploy_requests::{
    CancelDeployRequest, CloseDeployRequestRequest, CreateDeployRequestRequest, DeployRequest,
    DeployRequestReview, DeployRequestsService, GetDeployRequestRequest,
    ListDeployRequestsRequest, PerformDeployRequest, ReviewDeployRequestRequest, ReviewState,
};
pub use api::passwords::{
    DatabaseBranchPassword, DatabaseBranchPasswordRequest, DeleteDatabaseBranchPasswordRequest,
    GetDatabaseBranchPasswordRequest, ListDatabaseBranchPasswordRequest, PasswordsService,
};
pub use error::{ApiError, Error, ErrorCode, Result};
