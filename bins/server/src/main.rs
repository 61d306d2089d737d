//! CoffeeTech Transactions Service
//!
//! Main entry point for the transactions backend service.

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coffeetech_api::{AppState, create_router};
use coffeetech_clients::{FarmClient, UserClient};
use coffeetech_db::connect;
use coffeetech_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coffeetech=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Connect to database
    let db = connect(&config.database).await?;
    info!("Connected to database");

    // Create sibling service clients
    let users = UserClient::new(&config.clients)?;
    let farms = FarmClient::new(&config.clients)?;
    info!(
        users_service = %config.clients.user_service_url,
        farms_service = %config.clients.farms_service_url,
        "Sibling service clients configured"
    );

    // Create application state
    let state = AppState { db, users, farms };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
