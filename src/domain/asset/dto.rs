use chrono::{DateTime, Utc};

/// Fields for inserting a new asset, already validated by the asset service.
/// Optional descriptive fields default to empty strings in storage.
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub id: String,
    pub tag_id: String,
    pub epc: String,
    pub item_id: String,
    pub item_name: String,
    pub category: String,
    pub status: String,
    pub tag_type: String,
    pub frequency: String,
    pub current_location: String,
    pub zone: String,
    pub last_scan_time: Option<DateTime<Utc>>,
    pub last_scanned_by: String,
    pub battery_level: String,
    pub value: String,
    pub batch_number: String,
}
