//! Client for the users microservice.
//!
//! Handles session-token verification, role permissions, and user lookups.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use coffeetech_shared::ClientsConfig;

use crate::error::{ClientError, ClientResult};

/// A user as reported by the users service.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticatedUser {
    /// User ID.
    pub user_id: i32,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

/// Client for the users service.
#[derive(Debug, Clone)]
pub struct UserClient {
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    status: String,
    #[serde(default)]
    data: UserEnvelopeData,
}

#[derive(Debug, Default, Deserialize)]
struct UserEnvelopeData {
    user: Option<AuthenticatedUser>,
}

#[derive(Debug, Deserialize)]
struct PermissionsResponse {
    permissions: Vec<PermissionEntry>,
}

#[derive(Debug, Deserialize)]
struct PermissionEntry {
    name: String,
}

impl UserClient {
    /// Creates a new users-service client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientsConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            http,
            base_url: config.user_service_url.trim_end_matches('/').to_string(),
        })
    }

    /// Verifies a session token against the users service.
    ///
    /// Returns the user the token belongs to, or `None` when the token is
    /// invalid or the service rejects it.
    pub async fn verify_session_token(
        &self,
        session_token: &str,
    ) -> ClientResult<Option<AuthenticatedUser>> {
        let url = format!("{}/users-service/session-token-verification", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&json!({ "session_token": session_token }))
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Token verification rejected by users service");
            return Ok(None);
        }

        let envelope: UserEnvelope =
            response
                .json()
                .await
                .map_err(|e| ClientError::Decode {
                    url,
                    message: e.to_string(),
                })?;

        if envelope.status == "success" {
            Ok(envelope.data.user)
        } else {
            Ok(None)
        }
    }

    /// Fetches the permission names granted to a user role.
    pub async fn get_role_permissions(&self, user_role_id: i32) -> ClientResult<Vec<String>> {
        let url = format!(
            "{}/users-service/user-role/{user_role_id}/permissions",
            self.base_url
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus {
                url,
                status: response.status(),
            });
        }

        let parsed: PermissionsResponse =
            response
                .json()
                .await
                .map_err(|e| ClientError::Decode {
                    url,
                    message: e.to_string(),
                })?;

        Ok(parsed.permissions.into_iter().map(|p| p.name).collect())
    }

    /// Looks up a user by ID, for report history creator names.
    pub async fn get_user_by_id(&self, user_id: i32) -> ClientResult<Option<AuthenticatedUser>> {
        let url = format!("{}/users-service/user/{user_id}", self.base_url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            warn!(user_id, status = %response.status(), "User lookup failed");
            return Ok(None);
        }

        let envelope: UserEnvelope =
            response
                .json()
                .await
                .map_err(|e| ClientError::Decode {
                    url,
                    message: e.to_string(),
                })?;

        if envelope.status == "success" {
            Ok(envelope.data.user)
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{PermissionsResponse, UserEnvelope};

    #[test]
    fn test_token_verification_envelope_parses() {
        let body = json!({
            "status": "success",
            "message": "Token is valid",
            "data": {
                "user": { "user_id": 12, "name": "Ana", "email": "ana@example.com" }
            }
        });

        let envelope: UserEnvelope = serde_json::from_value(body).expect("should parse");
        assert_eq!(envelope.status, "success");
        let user = envelope.data.user.expect("user should be present");
        assert_eq!(user.user_id, 12);
        assert_eq!(user.name, "Ana");
        assert_eq!(user.email, "ana@example.com");
    }

    #[test]
    fn test_error_envelope_without_user_parses() {
        let body = json!({ "status": "error", "message": "Invalid token" });

        let envelope: UserEnvelope = serde_json::from_value(body).expect("should parse");
        assert_eq!(envelope.status, "error");
        assert!(envelope.data.user.is_none());
    }

    #[test]
    fn test_permissions_response_parses_names() {
        let body = json!({
            "permissions": [
                { "permission_id": 1, "name": "add_transaction" },
                { "permission_id": 2, "name": "read_transaction" }
            ]
        });

        let parsed: PermissionsResponse = serde_json::from_value(body).expect("should parse");
        let names: Vec<String> = parsed.permissions.into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["add_transaction", "read_transaction"]);
    }
}
