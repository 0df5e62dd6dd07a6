//! Assets module — RFID asset CRUD, check-in, export

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
