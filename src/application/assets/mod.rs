//! Asset management use-cases.

pub mod service;

pub use service::{AssetService, CheckInOutcome, CreateAssetInput, BULK_DELETE_CONFIRMATION};
