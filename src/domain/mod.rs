//! Core business entities, rules and repository interfaces.

pub mod asset;
pub mod policy;
pub mod user;

pub use asset::{Asset, AssetFilter, AssetRepositoryInterface, NewAsset};
pub use policy::{authorize, require_level, Action, Actor, UserRef};
pub use user::{CreateUserDto, User, UserRepositoryInterface, UserRole};
