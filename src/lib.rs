//! # Bike Charging Service
//!
//! HTTP service over a fleet of bike batteries and a charging station
//! catalog. Starting a charge spawns a background activity that raises the
//! battery's level once per tick until it reaches the full mark or is
//! stopped.
//!
//! ## Architecture
//!
//! - **domain**: entities and repository traits
//! - **application**: charge controller, charging activity, startup recovery
//! - **infrastructure**: SeaORM entities, migrations and repositories
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: error types and the shutdown signal
//! - **server**: process runtime used by the CLI

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

pub use interfaces::http::create_api_router;
