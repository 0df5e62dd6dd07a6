//! Health module — server and database health check

pub mod handlers;

pub use handlers::*;
