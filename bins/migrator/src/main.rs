//! Database migration runner for the CoffeeTech transactions service.
//!
//! Usage:
//!   migrator up      - Run all pending migrations
//!   migrator down    - Rollback last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-run migrations
//!
//! The connection is built from the `PG*` environment variables, same as
//! the server.

use sea_orm_migration::MigratorTrait;

use coffeetech_db::migration::Migrator;
use coffeetech_shared::DatabaseConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = DatabaseConfig::from_env()?;
    let db = coffeetech_db::connect(&config).await?;

    let command = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());
    match command.as_str() {
        "up" => Migrator::up(&db, None).await?,
        "down" => Migrator::down(&db, Some(1)).await?,
        "status" => Migrator::status(&db).await?,
        "fresh" => Migrator::fresh(&db).await?,
        other => anyhow::bail!("unknown command: {other} (expected up|down|status|fresh)"),
    }

    Ok(())
}
