//! Users module — user management (manager+ CRUD, role/status/password)

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
