//! Business logic and use-case orchestration.

pub mod assets;
pub mod identity;

pub use assets::AssetService;
pub use identity::IdentityService;
