//! Auth module — login, logout, current user

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
