use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{Asset, AssetFilter, NewAsset};
use crate::shared::DomainResult;

#[async_trait]
pub trait AssetRepositoryInterface: Send + Sync {
    /// List assets matching `filter`, newest first, capped at `limit` rows
    /// when one is given.
    async fn list(&self, filter: &AssetFilter, limit: Option<u64>) -> DomainResult<Vec<Asset>>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Asset>>;
    async fn find_by_tag_id(&self, tag_id: &str) -> DomainResult<Option<Asset>>;
    async fn find_by_epc(&self, epc: &str) -> DomainResult<Option<Asset>>;

    /// Insert a new asset. A UNIQUE violation on `epc` or `tag_id` surfaces
    /// as a conflict error — the constraint is the correctness boundary, the
    /// service's pre-check only produces the friendlier message.
    async fn insert(&self, asset: NewAsset) -> DomainResult<Asset>;

    /// Set `status = Checked` on one asset, recording scan time and scanner.
    async fn set_checked(
        &self,
        tag_id: &str,
        scan_time: DateTime<Utc>,
        scanned_by: &str,
    ) -> DomainResult<()>;

    /// Bulk variant: transitions every listed asset currently `Available`;
    /// returns the number of rows updated.
    async fn set_checked_bulk(
        &self,
        tag_ids: &[String],
        scan_time: DateTime<Utc>,
        scanned_by: &str,
    ) -> DomainResult<u64>;

    /// Delete one asset; returns the number of rows removed.
    async fn delete_by_tag_id(&self, tag_id: &str) -> DomainResult<u64>;

    async fn count_all(&self) -> DomainResult<u64>;

    /// Whole-table delete; returns the number of rows removed.
    async fn delete_all(&self) -> DomainResult<u64>;
}
