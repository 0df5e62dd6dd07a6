//! Asset entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Asset model. `status` is an open string set rather than an enum; only
/// `Available` and `Checked` carry transition semantics.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub tag_id: String,
    #[sea_orm(unique)]
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

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
