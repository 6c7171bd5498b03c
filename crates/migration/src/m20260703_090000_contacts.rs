use sea_orm_migration::prelude::*;

use crate::m20260702_090000_users_stores::Stores;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Customers {
    Table,
    Id,
    StoreId,
    Name,
    Email,
    Phone,
    Address,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Suppliers {
    Table,
    Id,
    StoreId,
    Name,
    Email,
    Phone,
    Address,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::StoreId).string().not_null())
                    .col(ColumnDef::new(Customers::Name).string().not_null())
                    .col(ColumnDef::new(Customers::Email).string())
                    .col(ColumnDef::new(Customers::Phone).string())
                    .col(ColumnDef::new(Customers::Address).string())
                    .col(ColumnDef::new(Customers::Notes).string())
                    .col(ColumnDef::new(Customers::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Customers::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-customers-store_id")
                            .from(Customers::Table, Customers::StoreId)
                            .to(Stores::Table, Stores::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Suppliers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Suppliers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Suppliers::StoreId).string().not_null())
                    .col(ColumnDef::new(Suppliers::Name).string().not_null())
                    .col(ColumnDef::new(Suppliers::Email).string())
                    .col(ColumnDef::new(Suppliers::Phone).string())
                    .col(ColumnDef::new(Suppliers::Address).string())
                    .col(ColumnDef::new(Suppliers::Notes).string())
                    .col(ColumnDef::new(Suppliers::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Suppliers::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-suppliers-store_id")
                            .from(Suppliers::Table, Suppliers::StoreId)
                            .to(Stores::Table, Stores::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Suppliers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}
