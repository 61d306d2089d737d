//! Application configuration management.
//!
//! Server and client settings come from layered config files plus
//! `COFFEETECH__`-prefixed environment variables. The PostgreSQL connection
//! keeps the conventional `PG*` environment variables read at startup.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// External microservice clients configuration.
    pub clients: ClientsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8004
}

/// Database configuration, read from the `PG*` environment variables.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database name.
    pub name: String,
    /// Database user.
    pub user: String,
    /// Database password.
    pub password: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    pub min_connections: u32,
}

impl DatabaseConfig {
    /// Reads the database configuration from the environment.
    ///
    /// `PGHOST` and `PGPORT` default to `localhost:5432`; `PGDATABASE`,
    /// `PGUSER`, and `PGPASSWORD` are required so that startup fails fast
    /// when the database is not configured.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is absent or `PGPORT` is not
    /// a valid port number.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let host = std::env::var("PGHOST").unwrap_or_else(|_| "localhost".to_string());
        let port = match std::env::var("PGPORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                config::ConfigError::Message(format!("PGPORT is not a valid port: {raw}"))
            })?,
            Err(_) => 5432,
        };

        Ok(Self {
            host,
            port,
            name: require_env("PGDATABASE")?,
            user: require_env("PGUSER")?,
            password: require_env("PGPASSWORD")?,
            max_connections: 10,
            min_connections: 1,
        })
    }

    /// Builds the PostgreSQL connection URL.
    #[must_use]
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }
}

fn require_env(key: &str) -> Result<String, config::ConfigError> {
    std::env::var(key)
        .map_err(|_| config::ConfigError::Message(format!("{key} must be set")))
}

/// Configuration for the users and farms microservice clients.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientsConfig {
    /// Base URL of the users service.
    #[serde(default = "default_user_service_url")]
    pub user_service_url: String,
    /// Base URL of the farms service.
    #[serde(default = "default_farms_service_url")]
    pub farms_service_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_client_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClientsConfig {
    fn default() -> Self {
        Self {
            user_service_url: default_user_service_url(),
            farms_service_url: default_farms_service_url(),
            timeout_secs: default_client_timeout_secs(),
        }
    }
}

fn default_user_service_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_farms_service_url() -> String {
    "http://localhost:8002".to_string()
}

fn default_client_timeout_secs() -> u64 {
    10
}

/// File- and environment-sourced settings (everything except the database).
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    clients: ClientsConfig,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or a required
    /// database variable is missing.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("COFFEETECH").separator("__"))
            .build()?;

        let settings: FileSettings = settings.try_deserialize()?;

        Ok(Self {
            server: settings.server,
            database: DatabaseConfig::from_env()?,
            clients: settings.clients,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
