//! Client for the farms microservice.
//!
//! Plots and farms are owned by the farms service; the transactions
//! service only stores plot IDs and asks here whenever it needs the rest.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

use coffeetech_shared::ClientsConfig;

use crate::decode_or_error_envelope;
use crate::error::{ClientError, ClientResult};

/// A plot as reported by the farms service.
#[derive(Debug, Clone, Deserialize)]
pub struct PlotInfo {
    /// Plot ID.
    pub plot_id: i32,
    /// Plot name.
    pub name: String,
    /// Owning farm ID.
    pub farm_id: i32,
}

/// A farm as reported by the farms service.
#[derive(Debug, Clone, Deserialize)]
pub struct FarmInfo {
    /// Farm ID.
    pub farm_id: i32,
    /// Farm name.
    pub name: String,
}

/// A user's role membership on a farm.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRoleFarm {
    /// Membership row ID.
    pub user_role_farm_id: i32,
    /// The user's role ID, resolvable to permissions via the users service.
    pub user_role_id: i32,
    /// Farm ID.
    pub farm_id: i32,
    /// Membership state ID.
    pub user_role_farm_state_id: i32,
    /// Membership state name.
    pub user_role_farm_state: String,
}

/// A user-role-farm state row.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRoleFarmState {
    /// State ID.
    pub user_role_farm_state_id: i32,
    /// State name.
    pub name: String,
}

/// Client for the farms service.
#[derive(Debug, Clone)]
pub struct FarmClient {
    http: Client,
    base_url: String,
}

impl FarmClient {
    /// Creates a new farms-service client.
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
            base_url: config.farms_service_url.trim_end_matches('/').to_string(),
        })
    }

    /// Verifies that a plot exists and is active.
    pub async fn verify_plot(&self, plot_id: i32) -> ClientResult<Option<PlotInfo>> {
        let url = format!("{}/farms-service/get-plot/{plot_id}", self.base_url);
        self.get_enveloped(&url).await
    }

    /// Fetches farm details by ID.
    pub async fn get_farm_by_id(&self, farm_id: i32) -> ClientResult<Option<FarmInfo>> {
        let url = format!("{}/farms-service/get-farm/{farm_id}", self.base_url);

        let started = Instant::now();
        let result = self.get_enveloped(&url).await;
        let elapsed = started.elapsed();

        match &result {
            Ok(_) => info!(farm_id, ?elapsed, "Farm lookup completed"),
            Err(e) => error!(farm_id, ?elapsed, error = %e, "Farm lookup failed"),
        }

        result
    }

    /// Fetches the user-role-farm membership for a user on a farm.
    pub async fn get_user_role_farm(
        &self,
        user_id: i32,
        farm_id: i32,
    ) -> ClientResult<Option<UserRoleFarm>> {
        let url = format!(
            "{}/farms-service/get-user-role-farm/{user_id}/{farm_id}",
            self.base_url
        );
        self.get_enveloped(&url).await
    }

    /// Fetches a user-role-farm state by name (e.g. `Active`).
    pub async fn get_user_role_farm_state(
        &self,
        state_name: &str,
    ) -> ClientResult<Option<UserRoleFarmState>> {
        let url = format!(
            "{}/farms-service/get-user-role-farm-state/{state_name}",
            self.base_url
        );
        self.get_enveloped(&url).await
    }

    /// GETs a farms-service endpoint, treating error envelopes as `None`.
    async fn get_enveloped<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> ClientResult<Option<T>> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.to_string(),
                source,
            })?;

        // The farms service signals "not found" both with 404s and with
        // error envelopes delivered under HTTP 200.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ClientError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        decode_or_error_envelope(url, body)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{FarmInfo, PlotInfo, UserRoleFarm};
    use crate::decode_or_error_envelope;

    #[test]
    fn test_plot_payload_parses() {
        let body = json!({ "plot_id": 3, "name": "Lote Norte", "farm_id": 1 });
        let plot: Option<PlotInfo> =
            decode_or_error_envelope("http://farms/get-plot/3", body).expect("should decode");
        let plot = plot.expect("plot should be present");
        assert_eq!(plot.plot_id, 3);
        assert_eq!(plot.farm_id, 1);
        assert_eq!(plot.name, "Lote Norte");
    }

    #[test]
    fn test_farm_payload_ignores_extra_fields() {
        let body = json!({
            "farm_id": 1,
            "name": "La Esperanza",
            "area": "12.5",
            "area_unit": "ha",
            "farm_state": "Active"
        });
        let farm: Option<FarmInfo> =
            decode_or_error_envelope("http://farms/get-farm/1", body).expect("should decode");
        assert_eq!(farm.expect("farm should be present").name, "La Esperanza");
    }

    #[test]
    fn test_user_role_farm_error_envelope_is_none() {
        let body = json!({ "status": "error", "message": "not associated" });
        let urf: Option<UserRoleFarm> =
            decode_or_error_envelope("http://farms/get-user-role-farm/1/1", body)
                .expect("should not fail");
        assert!(urf.is_none());
    }

    #[test]
    fn test_user_role_farm_parses() {
        let body = json!({
            "user_role_farm_id": 9,
            "user_role_id": 4,
            "farm_id": 1,
            "user_role_farm_state_id": 1,
            "user_role_farm_state": "Active"
        });
        let urf: Option<UserRoleFarm> =
            decode_or_error_envelope("http://farms/get-user-role-farm/1/1", body)
                .expect("should decode");
        assert_eq!(urf.expect("urf should be present").user_role_id, 4);
    }
}
