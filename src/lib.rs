//! # RFID Asset Service
//!
//! REST API for tracking RFID-tagged physical assets with JWT-based role
//! authentication.
//!
//! ## Architecture
//!
//! - **domain**: entities, the authorization policy, repository interfaces
//! - **application**: identity and asset services (validation, use-cases)
//! - **infrastructure**: crypto (JWT, bcrypt) and SeaORM persistence
//! - **interfaces**: HTTP REST API with Swagger documentation
//! - **shared**: error taxonomy used across layers

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::{create_api_router, AppState};
