//! API route definitions.

use axum::Router;
use axum::http::StatusCode;
use axum::response::Response;
use sea_orm::DbErr;
use tracing::error;

use coffeetech_clients::ClientError;

use crate::AppState;
use crate::response::error_response;

pub mod health;
pub mod reports;
pub mod transactions;

/// Renders a database failure as a 500 envelope.
pub(crate) fn db_failure(e: &DbErr) -> Response {
    error!(error = %e, "Database operation failed");
    error_response("Database error", StatusCode::INTERNAL_SERVER_ERROR)
}

/// Renders a sibling-service failure as a 500 envelope.
pub(crate) fn client_failure(e: &ClientError) -> Response {
    error!(error = %e, "Sibling service call failed");
    error_response(
        "Error communicating with a sibling service",
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(transactions::routes())
        .merge(reports::routes())
}
