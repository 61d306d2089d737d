//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes
//! - The uniform response envelope
//! - Session-token authentication against the users service

pub mod auth;
pub mod response;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use coffeetech_clients::{FarmClient, UserClient};

/// Application state shared across handlers.
///
/// All three members are cheap to clone; handlers clone what they need.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DatabaseConnection,
    /// Users service client (authentication, permissions).
    pub users: UserClient,
    /// Farms service client (plots, farms, memberships).
    pub farms: FarmClient,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
