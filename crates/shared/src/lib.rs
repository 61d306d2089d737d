//! Shared types for the CoffeeTech transactions service.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;

pub use config::{AppConfig, ClientsConfig, DatabaseConfig, ServerConfig};
pub use error::{AppError, AppResult};
