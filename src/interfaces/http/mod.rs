//! HTTP REST API
//!
//! - `common`: response envelope, error boundary, validated JSON extractor
//! - `middleware`: bearer/cookie/query token extraction and actor resolution
//! - `modules`: request handlers per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, AppState};
