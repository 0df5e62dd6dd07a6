//! Asset aggregate
//!
//! RFID-tagged physical asset entity, DTOs, and repository interface.

pub mod model;
pub mod repository;

mod dto;

pub use dto::NewAsset;
pub use model::{Asset, AssetFilter, STATUS_AVAILABLE, STATUS_CHECKED};
pub use repository::AssetRepositoryInterface;
