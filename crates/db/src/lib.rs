//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    ACTIVE_STATE, CatalogRepository, CreateTransactionInput, INACTIVE_STATE, TransactionError,
    TransactionRepository, TransactionStateRepository, UpdateTransactionInput,
};

use coffeetech_shared::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections);

    let db = Database::connect(options).await?;
    info!(
        host = %config.host,
        database = %config.name,
        "Database pool established"
    );

    Ok(db)
}
