//! Asset DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::assets::{CheckInOutcome, CreateAssetInput};
use crate::domain::asset::{Asset, AssetFilter};

/// Asset API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetDto {
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

impl From<Asset> for AssetDto {
    fn from(a: Asset) -> Self {
        Self {
            id: a.id,
            tag_id: a.tag_id,
            epc: a.epc,
            item_id: a.item_id,
            item_name: a.item_name,
            category: a.category,
            status: a.status,
            tag_type: a.tag_type,
            frequency: a.frequency,
            current_location: a.current_location,
            zone: a.zone,
            last_scan_time: a.last_scan_time,
            last_scanned_by: a.last_scanned_by,
            battery_level: a.battery_level,
            value: a.value,
            batch_number: a.batch_number,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// Create asset request. Optional descriptive fields default to empty;
/// required-field validation happens in the asset service so a missing field
/// is a 400 with a single message rather than a deserialization error.
#[derive(Debug, Deserialize, Validate, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssetRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub tag_id: String,
    #[serde(default)]
    pub epc: String,
    #[serde(default)]
    pub item_id: String,
    #[serde(default)]
    pub item_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tag_type: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub current_location: String,
    #[serde(default)]
    pub zone: String,
    #[serde(default)]
    pub last_scan_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_scanned_by: String,
    #[serde(default)]
    pub battery_level: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub batch_number: String,
}

impl From<CreateAssetRequest> for CreateAssetInput {
    fn from(r: CreateAssetRequest) -> Self {
        Self {
            id: r.id,
            tag_id: r.tag_id,
            epc: r.epc,
            item_id: r.item_id,
            item_name: r.item_name,
            category: r.category,
            status: r.status,
            tag_type: r.tag_type,
            frequency: r.frequency,
            current_location: r.current_location,
            zone: r.zone,
            last_scan_time: r.last_scan_time,
            last_scanned_by: r.last_scanned_by,
            battery_level: r.battery_level,
            value: r.value,
            batch_number: r.batch_number,
        }
    }
}

/// Identifier triple echoed back after a successful create.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetCreated {
    pub id: String,
    pub tag_id: String,
    pub epc: String,
}

#[derive(Debug, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    #[serde(default)]
    pub last_scanned_by: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkCheckInRequest {
    #[serde(default)]
    pub tag_ids: Vec<String>,
    #[serde(default)]
    pub last_scanned_by: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResponse {
    pub tag_id: String,
    pub status: String,
    pub last_scan_time: DateTime<Utc>,
    pub last_scanned_by: String,
}

impl From<CheckInOutcome> for CheckInResponse {
    fn from(o: CheckInOutcome) -> Self {
        Self {
            tag_id: o.tag_id,
            status: o.status,
            last_scan_time: o.last_scan_time,
            last_scanned_by: o.last_scanned_by,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkCheckInResponse {
    pub requested: usize,
    pub updated: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetDeleted {
    pub tag_id: String,
    pub deleted_by: String,
    pub deleted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllAssetsDeleted {
    pub deleted_count: u64,
    pub deleted_by: String,
    pub deleted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckEpcResponse {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetCreated>,
}

// ── Query parameters ────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListAssetsParams {
    /// Comma-separated column projection, filtered against the allowlist
    pub columns: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SearchAssetsParams {
    pub category: Option<String>,
    pub status: Option<String>,
    pub current_location: Option<String>,
    pub zone: Option<String>,
}

impl From<SearchAssetsParams> for AssetFilter {
    fn from(p: SearchAssetsParams) -> Self {
        Self {
            category: p.category,
            status: p.status,
            current_location: p.current_location,
            zone: p.zone,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CheckEpcParams {
    pub epc: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DeleteAllParams {
    /// Must equal the confirmation sentinel for the delete to run
    pub confirm: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ExportAssetsParams {
    pub category: Option<String>,
    pub status: Option<String>,
    pub current_location: Option<String>,
    pub zone: Option<String>,
    /// `json` (default) or `csv`
    pub format: Option<String>,
    pub columns: Option<String>,
}

impl ExportAssetsParams {
    pub fn filter(&self) -> AssetFilter {
        AssetFilter {
            category: self.category.clone(),
            status: self.status.clone(),
            current_location: self.current_location.clone(),
            zone: self.zone.clone(),
        }
    }
}

// ── Column projection ───────────────────────────────────────────

/// Allowlist for the `columns` query parameter; unknown names are dropped.
pub const ASSET_COLUMNS: &[&str] = &[
    "id",
    "tagId",
    "epc",
    "itemId",
    "itemName",
    "category",
    "status",
    "tagType",
    "frequency",
    "currentLocation",
    "zone",
    "lastScanTime",
    "lastScannedBy",
    "batteryLevel",
    "value",
    "batchNumber",
];

/// Parse a `columns` parameter against the allowlist. `None` means the full
/// record should be returned (either no parameter, or nothing survived the
/// allowlist).
pub fn selected_columns(param: Option<&str>) -> Option<Vec<&'static str>> {
    let param = param?;
    let picked: Vec<&'static str> = param
        .split(',')
        .map(str::trim)
        .filter_map(|requested| ASSET_COLUMNS.iter().find(|c| **c == requested).copied())
        .collect();
    if picked.is_empty() {
        None
    } else {
        Some(picked)
    }
}

/// Project an asset onto the selected columns.
pub fn project(dto: &AssetDto, columns: &[&'static str]) -> Value {
    let full = serde_json::to_value(dto).unwrap_or(Value::Null);
    let mut out = serde_json::Map::new();
    for column in columns {
        if let Some(v) = full.get(*column) {
            out.insert((*column).to_string(), v.clone());
        }
    }
    Value::Object(out)
}

/// Render a list of assets, applying the optional column projection.
pub fn render_assets(assets: Vec<Asset>, columns_param: Option<&str>) -> (u64, Value) {
    let dtos: Vec<AssetDto> = assets.into_iter().map(AssetDto::from).collect();
    let count = dtos.len() as u64;
    let value = match selected_columns(columns_param) {
        Some(columns) => Value::Array(dtos.iter().map(|d| project(d, &columns)).collect()),
        None => serde_json::to_value(&dtos).unwrap_or_else(|_| Value::Array(Vec::new())),
    };
    (count, value)
}

/// Render one asset, applying the optional column projection.
pub fn render_asset(asset: Asset, columns_param: Option<&str>) -> Value {
    let dto = AssetDto::from(asset);
    match selected_columns(columns_param) {
        Some(columns) => project(&dto, &columns),
        None => serde_json::to_value(&dto).unwrap_or(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::STATUS_AVAILABLE;

    fn asset() -> Asset {
        let now = Utc::now();
        Asset {
            id: "a1".into(),
            tag_id: "t1".into(),
            epc: "e1".into(),
            item_id: String::new(),
            item_name: "Forklift".into(),
            category: "Equipment".into(),
            status: STATUS_AVAILABLE.into(),
            tag_type: String::new(),
            frequency: String::new(),
            current_location: "Dock 4".into(),
            zone: "A".into(),
            last_scan_time: None,
            last_scanned_by: String::new(),
            battery_level: String::new(),
            value: String::new(),
            batch_number: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn unknown_columns_are_dropped() {
        let columns = selected_columns(Some("id, tagId, password_hash")).unwrap();
        assert_eq!(columns, vec!["id", "tagId"]);
    }

    #[test]
    fn all_unknown_columns_fall_back_to_full_record() {
        assert!(selected_columns(Some("nope,also_nope")).is_none());
        assert!(selected_columns(None).is_none());
    }

    #[test]
    fn projection_keeps_only_selected_keys() {
        let value = render_asset(asset(), Some("id,epc"));
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["id"], "a1");
        assert_eq!(obj["epc"], "e1");
    }

    #[test]
    fn full_render_uses_camel_case_keys() {
        let value = render_asset(asset(), None);
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("tagId"));
        assert!(obj.contains_key("currentLocation"));
        assert!(!obj.contains_key("tag_id"));
    }
}
