//! API path builders
//!
//! Pure string builders for resource paths. Paths are relative to the
//! transport's base URL and carry the API version prefix. Organization,
//! database and branch names are expected to already be URL-safe.

/// API version prefix
pub const API_VERSION: &str = "v1";

/// `v1/organizations/{org}/databases`
pub fn databases_api_path(org: &str) -> String {
    format!("{}/organizations/{}/databases", API_VERSION, org)
}

/// `v1/organizations/{org}/databases/{db}`
pub fn database_api_path(org: &str, db: &str) -> String {
    format!("{}/{}", databases_api_path(org), db)
}

// =========================================================================
// Deploy requests
// =========================================================================

/// Collection path for deploy requests of a database
pub fn deploy_requests_api_path(org: &str, db: &str) -> String {
    format!("{}/deploy-requests", database_api_path(org, db))
}

/// Path of a single deploy request
pub fn deploy_request_api_path(org: &str, db: &str, number: u64) -> String {
    format!("{}/{}", deploy_requests_api_path(org, db), number)
}

/// Action sub-path of a deploy request, e.g. `.../deploy-requests/7/deploy`
pub fn deploy_request_action_api_path(org: &str, db: &str, number: u64, action: &str) -> String {
    format!("{}/{}", deploy_request_api_path(org, db, number), action)
}

// =========================================================================
// Branches and branch passwords
// =========================================================================

/// `v1/organizations/{org}/databases/{db}/branches`
pub fn database_branches_api_path(org: &str, db: &str) -> String {
    format!("{}/branches", database_api_path(org, db))
}

/// Collection path for passwords of a branch
pub fn passwords_api_path(org: &str, db: &str, branch: &str) -> String {
    format!("{}/{}/passwords", database_branches_api_path(org, db), branch)
}

/// Path of a single branch password
pub fn password_api_path(org: &str, db: &str, branch: &str, password_id: &str) -> String {
    format!("{}/{}", passwords_api_path(org, db, branch), password_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deploy_request_paths() {
        assert_eq!(
            deploy_requests_api_path("my-org", "my-db"),
            "v1/organizations/my-org/databases/my-db/deploy-requests"
        );
        assert_eq!(
            deploy_request_api_path("my-org", "my-db", 42),
            "v1/organizations/my-org/databases/my-db/deploy-requests/42"
        );
        assert_eq!(
            deploy_request_action_api_path("my-org", "my-db", 42, "cancel"),
            "v1/organizations/my-org/databases/my-db/deploy-requests/42/cancel"
        );
    }

    #[test]
    fn test_password_paths() {
        assert_eq!(
            passwords_api_path("my-org", "my-db", "main"),
            "v1/organizations/my-org/databases/my-db/branches/main/passwords"
        );
        assert_eq!(
            password_api_path("my-org", "my-db", "main", "pw1"),
            "v1/organizations/my-org/databases/my-db/branches/main/passwords/pw1"
        );
    }
}
