use sea_orm_migration::prelude::*;

use crate::m20260702_090000_users_stores::Stores;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum ItemGroups {
    Table,
    Id,
    StoreId,
    Name,
    ParentGroupId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum StockItems {
    Table,
    Id,
    StoreId,
    GroupId,
    Name,
    Quantity,
    Properties,
    ImageFilename,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ItemGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ItemGroups::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ItemGroups::StoreId).string().not_null())
                    .col(ColumnDef::new(ItemGroups::Name).string().not_null())
                    .col(ColumnDef::new(ItemGroups::ParentGroupId).string())
                    .col(ColumnDef::new(ItemGroups::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(ItemGroups::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-item_groups-store_id")
                            .from(ItemGroups::Table, ItemGroups::StoreId)
                            .to(Stores::Table, Stores::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-item_groups-parent_group_id")
                            .from(ItemGroups::Table, ItemGroups::ParentGroupId)
                            .to(ItemGroups::Table, ItemGroups::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StockItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StockItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StockItems::StoreId).string().not_null())
                    .col(ColumnDef::new(StockItems::GroupId).string())
                    .col(ColumnDef::new(StockItems::Name).string().not_null())
                    .col(
                        ColumnDef::new(StockItems::Quantity)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(StockItems::Properties).text())
                    .col(ColumnDef::new(StockItems::ImageFilename).string())
                    .col(ColumnDef::new(StockItems::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(StockItems::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-stock_items-store_id")
                            .from(StockItems::Table, StockItems::StoreId)
                            .to(Stores::Table, Stores::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-stock_items-group_id")
                            .from(StockItems::Table, StockItems::GroupId)
                            .to(ItemGroups::Table, ItemGroups::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-stock_items-store_id-name")
                    .table(StockItems::Table)
                    .col(StockItems::StoreId)
                    .col(StockItems::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StockItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ItemGroups::Table).to_owned())
            .await
    }
}
