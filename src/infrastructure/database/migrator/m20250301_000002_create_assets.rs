//! Migration to create assets table
//!
//! The UNIQUE indexes on `tag_id` and `epc` are the authoritative uniqueness
//! guard; service-level pre-checks only improve the error message.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Assets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assets::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Assets::TagId)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Assets::Epc)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Assets::ItemId)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Assets::ItemName).string().not_null())
                    .col(ColumnDef::new(Assets::Category).string().not_null())
                    .col(ColumnDef::new(Assets::Status).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Assets::TagType)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Assets::Frequency)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Assets::CurrentLocation)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Assets::Zone)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Assets::LastScanTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Assets::LastScannedBy)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Assets::BatteryLevel)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Assets::Value)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Assets::BatchNumber)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Assets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assets_status")
                    .table(Assets::Table)
                    .col(Assets::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assets_category")
                    .table(Assets::Table)
                    .col(Assets::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assets_zone")
                    .table(Assets::Table)
                    .col(Assets::Zone)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Assets::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Assets {
    Table,
    Id,
    TagId,
    Epc,
    ItemId,
    ItemName,
    Category,
    Status,
    TagType,
    Frequency,
    CurrentLocation,
    Zone,
    LastScanTime,
    LastScannedBy,
    BatteryLevel,
    Value,
    BatchNumber,
    CreatedAt,
    UpdatedAt,
}
