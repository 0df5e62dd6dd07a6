use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::domain::asset::{
    Asset, AssetFilter, AssetRepositoryInterface, NewAsset, STATUS_AVAILABLE, STATUS_CHECKED,
};
use crate::infrastructure::database::entities::asset;
use crate::shared::{DomainError, DomainResult};

pub struct AssetRepository {
    db: DatabaseConnection,
}

impl AssetRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn asset_model_to_domain(model: asset::Model) -> Asset {
    Asset {
        id: model.id,
        tag_id: model.tag_id,
        epc: model.epc,
        item_id: model.item_id,
        item_name: model.item_name,
        category: model.category,
        status: model.status,
        tag_type: model.tag_type,
        frequency: model.frequency,
        current_location: model.current_location,
        zone: model.zone,
        last_scan_time: model.last_scan_time,
        last_scanned_by: model.last_scanned_by,
        battery_level: model.battery_level,
        value: model.value,
        batch_number: model.batch_number,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn apply_filter(
    mut query: sea_orm::Select<asset::Entity>,
    filter: &AssetFilter,
) -> sea_orm::Select<asset::Entity> {
    if let Some(ref category) = filter.category {
        query = query.filter(asset::Column::Category.eq(category));
    }
    if let Some(ref status) = filter.status {
        query = query.filter(asset::Column::Status.eq(status));
    }
    if let Some(ref location) = filter.current_location {
        query = query.filter(asset::Column::CurrentLocation.eq(location));
    }
    if let Some(ref zone) = filter.zone {
        query = query.filter(asset::Column::Zone.eq(zone));
    }
    query
}

fn is_unique_violation(e: &sea_orm::DbErr) -> bool {
    let msg = e.to_string();
    msg.contains("UNIQUE") || msg.contains("duplicate")
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl AssetRepositoryInterface for AssetRepository {
    async fn list(&self, filter: &AssetFilter, limit: Option<u64>) -> DomainResult<Vec<Asset>> {
        let query = apply_filter(asset::Entity::find(), filter)
            .order_by_desc(asset::Column::CreatedAt)
            .limit(limit);

        let models = query.all(&self.db).await?;
        Ok(models.into_iter().map(asset_model_to_domain).collect())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Asset>> {
        let model = asset::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(asset_model_to_domain))
    }

    async fn find_by_tag_id(&self, tag_id: &str) -> DomainResult<Option<Asset>> {
        let model = asset::Entity::find()
            .filter(asset::Column::TagId.eq(tag_id))
            .one(&self.db)
            .await?;
        Ok(model.map(asset_model_to_domain))
    }

    async fn find_by_epc(&self, epc: &str) -> DomainResult<Option<Asset>> {
        let model = asset::Entity::find()
            .filter(asset::Column::Epc.eq(epc))
            .one(&self.db)
            .await?;
        Ok(model.map(asset_model_to_domain))
    }

    async fn insert(&self, new: NewAsset) -> DomainResult<Asset> {
        let now = Utc::now();

        let active = asset::ActiveModel {
            id: Set(new.id),
            tag_id: Set(new.tag_id),
            epc: Set(new.epc),
            item_id: Set(new.item_id),
            item_name: Set(new.item_name),
            category: Set(new.category),
            status: Set(new.status),
            tag_type: Set(new.tag_type),
            frequency: Set(new.frequency),
            current_location: Set(new.current_location),
            zone: Set(new.zone),
            last_scan_time: Set(new.last_scan_time),
            last_scanned_by: Set(new.last_scanned_by),
            battery_level: Set(new.battery_level),
            value: Set(new.value),
            batch_number: Set(new.batch_number),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = active.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict("EPC or Tag ID already exists", None)
            } else {
                DomainError::Database(e)
            }
        })?;

        Ok(asset_model_to_domain(created))
    }

    async fn set_checked(
        &self,
        tag_id: &str,
        scan_time: DateTime<Utc>,
        scanned_by: &str,
    ) -> DomainResult<()> {
        let Some(existing) = asset::Entity::find()
            .filter(asset::Column::TagId.eq(tag_id))
            .one(&self.db)
            .await?
        else {
            return Err(DomainError::NotFound(format!(
                "Asset not found: {}",
                tag_id
            )));
        };

        let mut active: asset::ActiveModel = existing.into();
        active.status = Set(STATUS_CHECKED.to_string());
        active.last_scan_time = Set(Some(scan_time));
        active.last_scanned_by = Set(scanned_by.to_string());
        active.updated_at = Set(scan_time);
        active.update(&self.db).await?;

        Ok(())
    }

    async fn set_checked_bulk(
        &self,
        tag_ids: &[String],
        scan_time: DateTime<Utc>,
        scanned_by: &str,
    ) -> DomainResult<u64> {
        if tag_ids.is_empty() {
            return Ok(0);
        }

        let result = asset::Entity::update_many()
            .filter(asset::Column::TagId.is_in(tag_ids.iter().cloned()))
            .filter(asset::Column::Status.eq(STATUS_AVAILABLE))
            .col_expr(asset::Column::Status, Expr::value(STATUS_CHECKED))
            .col_expr(asset::Column::LastScanTime, Expr::value(scan_time))
            .col_expr(asset::Column::LastScannedBy, Expr::value(scanned_by))
            .col_expr(asset::Column::UpdatedAt, Expr::value(scan_time))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn delete_by_tag_id(&self, tag_id: &str) -> DomainResult<u64> {
        let result = asset::Entity::delete_many()
            .filter(asset::Column::TagId.eq(tag_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn count_all(&self) -> DomainResult<u64> {
        let total = asset::Entity::find().count(&self.db).await?;
        Ok(total)
    }

    async fn delete_all(&self) -> DomainResult<u64> {
        let result = asset::Entity::delete_many().exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}
