//! PlanetScale API interaction module
//!
//! Typed access to the PlanetScale management API. Every operation is one
//! HTTP round trip: build the path, encode the request, send, decode.
//!
//! # Module Structure
//!
//! - [`auth`] - Access token and service token credentials
//! - [`client`] - Main client and its builder
//! - [`http`] - HTTP transport shared by all services
//! - [`paths`] - Resource path builders
//! - [`deploy_requests`] - Deploy requests service
//! - [`passwords`] - Branch passwords service
//!
//! # Example
//!
//! ```no_run
//! use planetscale::api::client::Client;
//! use planetscale::api::deploy_requests::{DeployRequestsService, ListDeployRequestsRequest};
//!
//! async fn example() -> planetscale::Result<()> {
//!     let client = Client::builder().access_token("pscale_tkn_...").build()?;
//!     let requests = client
//!         .deploy_requests
//!         .list(&ListDeployRequestsRequest {
//!             organization: "my-org".to_string(),
//!             database: "my-db".to_string(),
//!         })
//!         .await?;
//!     println!("{} open deploy requests", requests.len());
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod deploy_requests;
pub mod http;
pub mod passwords;
pub mod paths;
