//! Session-token authentication and farm-level authorization.
//!
//! Every business endpoint authenticates a `session_token` query parameter
//! against the users service, then checks the caller's membership and role
//! permissions on the farm that owns the affected plot. Helpers return
//! `Err(Response)` with the envelope already rendered so handlers can use
//! `?` and keep their happy path linear.

use axum::http::StatusCode;
use axum::response::Response;
use serde::Deserialize;
use tracing::warn;

use coffeetech_clients::{AuthenticatedUser, FarmClient, UserClient, UserRoleFarm};

use crate::response::{error_response, invalid_token_response};

/// Permission required to create transactions.
pub const ADD_TRANSACTION: &str = "add_transaction";
/// Permission required to edit transactions.
pub const EDIT_TRANSACTION: &str = "edit_transaction";
/// Permission required to delete transactions.
pub const DELETE_TRANSACTION: &str = "delete_transaction";
/// Permission required to list transactions.
pub const READ_TRANSACTION: &str = "read_transaction";
/// Permission required to generate financial reports.
pub const READ_FINANCIAL_REPORT: &str = "read_financial_report";

/// Name of the active membership state in the farms service.
const ACTIVE_MEMBERSHIP: &str = "Active";

/// Query parameters carrying the session token.
#[derive(Debug, Deserialize)]
pub struct SessionTokenQuery {
    /// The caller's session token.
    pub session_token: Option<String>,
}

/// Verifies the session token and resolves the calling user.
///
/// A missing token and a rejected token both answer 401; a users-service
/// outage is treated as a rejected token rather than a 500.
pub async fn authenticate(
    users: &UserClient,
    session_token: Option<&str>,
) -> Result<AuthenticatedUser, Response> {
    let token = match session_token {
        Some(token) if !token.is_empty() => token,
        _ => {
            return Err(error_response(
                "Session token missing",
                StatusCode::UNAUTHORIZED,
            ));
        }
    };

    match users.verify_session_token(token).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(invalid_token_response()),
        Err(e) => {
            warn!(error = %e, "Session token verification unavailable");
            Err(invalid_token_response())
        }
    }
}

/// Checks that the user holds an active membership on the farm and that
/// the membership's role grants `permission`.
///
/// `action` is the human-readable verb used in the 403 message, e.g.
/// `"add transactions"`.
pub async fn authorize_farm_action(
    farms: &FarmClient,
    users: &UserClient,
    user_id: i32,
    farm_id: i32,
    permission: &str,
    action: &str,
) -> Result<UserRoleFarm, Response> {
    let membership = farms
        .get_user_role_farm(user_id, farm_id)
        .await
        .map_err(|e| {
            warn!(user_id, farm_id, error = %e, "Membership lookup failed");
            error_response(
                "Error communicating with the farms service",
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        })?
        .ok_or_else(|| {
            error_response(
                "You are not associated with this farm",
                StatusCode::FORBIDDEN,
            )
        })?;

    let active_state = farms
        .get_user_role_farm_state(ACTIVE_MEMBERSHIP)
        .await
        .map_err(|e| {
            warn!(error = %e, "Membership state lookup failed");
            error_response(
                "Error communicating with the farms service",
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        })?
        .ok_or_else(|| {
            error_response(
                "Active membership state not found",
                StatusCode::BAD_REQUEST,
            )
        })?;

    if membership.user_role_farm_state_id != active_state.user_role_farm_state_id {
        return Err(error_response(
            "Your association with this farm is not active",
            StatusCode::FORBIDDEN,
        ));
    }

    let permissions = users
        .get_role_permissions(membership.user_role_id)
        .await
        .map_err(|e| {
            warn!(user_role_id = membership.user_role_id, error = %e, "Permission lookup failed");
            error_response(
                "Error communicating with the users service",
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        })?;

    if !permissions.iter().any(|p| p == permission) {
        return Err(error_response(
            &format!("You do not have permission to {action}"),
            StatusCode::FORBIDDEN,
        ));
    }

    Ok(membership)
}
