//! Asset service — validation and CRUD orchestration
//!
//! Enforces the asset invariants: required fields on create, `epc`/`tag_id`
//! uniqueness (pre-checked for a friendly conflict message; the UNIQUE index
//! is the authoritative guard), and the `Available` → `Checked` status
//! transition. Permission checks run before any mutating repository call.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::asset::{
    Asset, AssetFilter, AssetRepositoryInterface, NewAsset, STATUS_CHECKED,
};
use crate::domain::policy::{self, Action, Actor};
use crate::shared::{DomainError, DomainResult};

/// Sentinel the caller must supply to authorize a whole-table delete.
pub const BULK_DELETE_CONFIRMATION: &str = "DELETE_ALL_CONFIRM";

/// Row cap on unfiltered list/search responses.
const MAX_LIST_ROWS: u64 = 1000;

/// Raw create-asset fields as received from the caller.
#[derive(Debug, Clone, Default)]
pub struct CreateAssetInput {
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

/// Fields written by a successful check-in.
#[derive(Debug, Clone)]
pub struct CheckInOutcome {
    pub tag_id: String,
    pub status: String,
    pub last_scan_time: DateTime<Utc>,
    pub last_scanned_by: String,
}

pub struct AssetService<R: AssetRepositoryInterface> {
    repo: Arc<R>,
}

impl<R: AssetRepositoryInterface> AssetService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    // ── Reads (open to everyone) ────────────────────────────────

    pub async fn list(&self) -> DomainResult<Vec<Asset>> {
        self.repo
            .list(&AssetFilter::default(), Some(MAX_LIST_ROWS))
            .await
    }

    pub async fn search(&self, filter: AssetFilter) -> DomainResult<Vec<Asset>> {
        self.repo.list(&filter, Some(MAX_LIST_ROWS)).await
    }

    pub async fn get_by_id(&self, id: &str) -> DomainResult<Asset> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Asset not found with ID: {}", id)))
    }

    pub async fn get_by_tag_id(&self, tag_id: &str) -> DomainResult<Asset> {
        self.repo
            .find_by_tag_id(tag_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Asset not found: {}", tag_id)))
    }

    pub async fn check_epc(&self, epc: &str) -> DomainResult<Option<Asset>> {
        if epc.is_empty() {
            return Err(DomainError::Validation(
                "Please provide an EPC to check".into(),
            ));
        }
        self.repo.find_by_epc(epc).await
    }

    // ── Mutations ───────────────────────────────────────────────

    pub async fn create(&self, actor: Option<&Actor>, input: CreateAssetInput) -> DomainResult<Asset> {
        policy::authorize(actor, &Action::CreateAsset)?;

        if input.id.is_empty()
            || input.tag_id.is_empty()
            || input.epc.is_empty()
            || input.item_name.is_empty()
            || input.category.is_empty()
            || input.status.is_empty()
        {
            return Err(DomainError::Validation(
                "id, tagId, epc, itemName, category and status are required".into(),
            ));
        }

        // Friendly conflicts carrying the existing record's id; the UNIQUE
        // index catches whatever races past these reads.
        if let Some(existing) = self.repo.find_by_epc(&input.epc).await? {
            return Err(DomainError::conflict(
                "EPC already exists",
                Some(existing.id),
            ));
        }
        if let Some(existing) = self.repo.find_by_tag_id(&input.tag_id).await? {
            return Err(DomainError::conflict(
                "Tag ID already exists",
                Some(existing.id),
            ));
        }

        let asset = self
            .repo
            .insert(NewAsset {
                id: input.id,
                tag_id: input.tag_id,
                epc: input.epc,
                item_id: input.item_id,
                item_name: input.item_name,
                category: input.category,
                status: input.status,
                tag_type: input.tag_type,
                frequency: input.frequency,
                current_location: input.current_location,
                zone: input.zone,
                last_scan_time: input.last_scan_time.or_else(|| Some(Utc::now())),
                last_scanned_by: input.last_scanned_by,
                battery_level: input.battery_level,
                value: input.value,
                batch_number: input.batch_number,
            })
            .await?;

        info!(asset_id = %asset.id, tag_id = %asset.tag_id, "Asset created");
        Ok(asset)
    }

    /// Check in one asset: only the `Available` status may transition.
    pub async fn check_in(
        &self,
        actor: Option<&Actor>,
        tag_id: &str,
        scanned_by: Option<&str>,
    ) -> DomainResult<CheckInOutcome> {
        policy::authorize(actor, &Action::CheckInAsset)?;

        if tag_id.is_empty() {
            return Err(DomainError::Validation(
                "Please provide the tagId to update".into(),
            ));
        }

        let asset = self
            .repo
            .find_by_tag_id(tag_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Asset not found: {}", tag_id)))?;

        if !asset.is_available() {
            return Err(DomainError::Validation(
                "Can update only Available status".into(),
            ));
        }

        let now = Utc::now();
        let scanner = scanner_name(scanned_by);
        self.repo.set_checked(tag_id, now, &scanner).await?;

        Ok(CheckInOutcome {
            tag_id: tag_id.to_string(),
            status: STATUS_CHECKED.to_string(),
            last_scan_time: now,
            last_scanned_by: scanner,
        })
    }

    /// Bulk check-in: transitions every listed asset currently `Available`
    /// and reports how many rows changed.
    pub async fn bulk_check_in(
        &self,
        actor: Option<&Actor>,
        tag_ids: &[String],
        scanned_by: Option<&str>,
    ) -> DomainResult<u64> {
        policy::authorize(actor, &Action::CheckInAsset)?;

        if tag_ids.is_empty() {
            return Err(DomainError::Validation(
                "Please provide tagIds to update".into(),
            ));
        }

        let now = Utc::now();
        let scanner = scanner_name(scanned_by);
        let updated = self.repo.set_checked_bulk(tag_ids, now, &scanner).await?;

        info!(requested = tag_ids.len(), updated, "Bulk check-in");
        Ok(updated)
    }

    pub async fn delete(&self, actor: Option<&Actor>, tag_id: &str) -> DomainResult<()> {
        policy::authorize(actor, &Action::DeleteAsset)?;

        if tag_id.is_empty() {
            return Err(DomainError::Validation(
                "Please provide the tagId to delete".into(),
            ));
        }

        let deleted = self.repo.delete_by_tag_id(tag_id).await?;
        if deleted == 0 {
            return Err(DomainError::NotFound(format!(
                "Asset not found: {}",
                tag_id
            )));
        }

        info!(tag_id, "Asset deleted");
        Ok(())
    }

    /// Whole-table delete gated behind the confirmation sentinel. Returns the
    /// pre-delete row count.
    pub async fn delete_all(
        &self,
        actor: Option<&Actor>,
        confirm: Option<&str>,
    ) -> DomainResult<u64> {
        policy::authorize(actor, &Action::DeleteAllAssets)?;

        if confirm != Some(BULK_DELETE_CONFIRMATION) {
            return Err(DomainError::Validation(format!(
                "Confirm deletion with query parameter: ?confirm={}",
                BULK_DELETE_CONFIRMATION
            )));
        }

        let total = self.repo.count_all().await?;
        if total == 0 {
            return Ok(0);
        }

        self.repo.delete_all().await?;

        info!(deleted = total, "All assets deleted");
        Ok(total)
    }

    pub async fn export(
        &self,
        actor: Option<&Actor>,
        filter: AssetFilter,
    ) -> DomainResult<Vec<Asset>> {
        policy::authorize(actor, &Action::ExportAssets)?;
        self.repo.list(&filter, None).await
    }
}

/// Scanner attribution: trimmed caller-supplied name, `"System"` when
/// blank or absent.
fn scanner_name(input: Option<&str>) -> String {
    match input {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => "System".to_string(),
    }
}
