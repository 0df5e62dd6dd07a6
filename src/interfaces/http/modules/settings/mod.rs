//! Settings module — admin-only system settings

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
