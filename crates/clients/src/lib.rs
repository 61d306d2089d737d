//! HTTP clients for the sibling CoffeeTech microservices.
//!
//! The transactions service does not own users, roles, farms, or plots.
//! Those live in the users service and the farms service; this crate wraps
//! the handful of endpoints the transactions service needs:
//! - session-token verification and role permissions (users service)
//! - plot, farm, and user-role-farm lookups (farms service)
//!
//! A "negative" answer from a service (unknown entity, invalid token, or an
//! error envelope in the body) is `Ok(None)`; transport and decode failures
//! are `Err` so callers can distinguish "no" from "unreachable".

pub mod error;
pub mod farms;
pub mod users;

pub use error::{ClientError, ClientResult};
pub use farms::{FarmClient, FarmInfo, PlotInfo, UserRoleFarm, UserRoleFarmState};
pub use users::{AuthenticatedUser, UserClient};

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decodes a service body that may either be the expected payload or an
/// error envelope (`{"status": "error", ...}`) delivered with HTTP 200.
///
/// Returns `Ok(None)` for error envelopes.
pub(crate) fn decode_or_error_envelope<T: DeserializeOwned>(
    url: &str,
    body: Value,
) -> ClientResult<Option<T>> {
    if body.get("status").and_then(Value::as_str) == Some("error") {
        return Ok(None);
    }

    serde_json::from_value(body)
        .map(Some)
        .map_err(|e| ClientError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::decode_or_error_envelope;

    #[derive(Debug, Deserialize, PartialEq, Eq)]
    struct Sample {
        id: i32,
        name: String,
    }

    #[test]
    fn test_decodes_expected_payload() {
        let body = json!({ "id": 7, "name": "El Mirador" });
        let decoded: Option<Sample> =
            decode_or_error_envelope("http://farms/get-plot/7", body).expect("should decode");
        assert_eq!(
            decoded,
            Some(Sample {
                id: 7,
                name: "El Mirador".to_string()
            })
        );
    }

    #[test]
    fn test_error_envelope_is_none() {
        let body = json!({ "status": "error", "message": "Plot not found" });
        let decoded: Option<Sample> =
            decode_or_error_envelope("http://farms/get-plot/7", body).expect("should not fail");
        assert_eq!(decoded, None);
    }

    #[test]
    fn test_malformed_payload_is_decode_error() {
        let body = json!({ "id": "not-a-number" });
        let result: super::ClientResult<Option<Sample>> =
            decode_or_error_envelope("http://farms/get-plot/7", body);
        assert!(result.is_err());
    }
}
