use chrono::{DateTime, Utc};

/// The only status an asset can be checked in from.
pub const STATUS_AVAILABLE: &str = "Available";
/// Status written by a successful check-in scan.
pub const STATUS_CHECKED: &str = "Checked";

/// Asset domain model.
///
/// `status` is an open string set; `Available` and `Checked` are the two
/// values with transition semantics. `epc` and `tag_id` are globally unique
/// across all assets — the UNIQUE indexes in the migration are the
/// authoritative guard.
#[derive(Debug, Clone)]
pub struct Asset {
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    pub fn is_available(&self) -> bool {
        self.status == STATUS_AVAILABLE
    }
}

/// Equality filters for search and export; `None` fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct AssetFilter {
    pub category: Option<String>,
    pub status: Option<String>,
    pub current_location: Option<String>,
    pub zone: Option<String>,
}

impl AssetFilter {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.status.is_none()
            && self.current_location.is_none()
            && self.zone.is_none()
    }
}
