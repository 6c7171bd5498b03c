use sea_orm_migration::prelude::*;

use crate::m20260702_090000_users_stores::Stores;
use crate::m20260702_110000_catalog::StockItems;
use crate::m20260703_090000_contacts::{Customers, Suppliers};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Documents {
    Table,
    Id,
    StoreId,
    Kind,
    DocumentDate,
    CustomerId,
    SupplierId,
    Status,
    Notes,
    TotalAmount,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
    CancelledAt,
    CancelledBy,
}

#[derive(Iden)]
enum DocumentItems {
    Table,
    Id,
    DocumentId,
    ItemId,
    LineNo,
    Quantity,
    UnitPrice,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Documents::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Documents::StoreId).string().not_null())
                    .col(ColumnDef::new(Documents::Kind).string().not_null())
                    .col(ColumnDef::new(Documents::DocumentDate).date().not_null())
                    .col(ColumnDef::new(Documents::CustomerId).string())
                    .col(ColumnDef::new(Documents::SupplierId).string())
                    .col(ColumnDef::new(Documents::Status).string().not_null())
                    .col(ColumnDef::new(Documents::Notes).string())
                    .col(
                        ColumnDef::new(Documents::TotalAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Documents::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Documents::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Documents::UpdatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Documents::CancelledAt).timestamp())
                    .col(ColumnDef::new(Documents::CancelledBy).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-documents-store_id")
                            .from(Documents::Table, Documents::StoreId)
                            .to(Stores::Table, Stores::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-documents-customer_id")
                            .from(Documents::Table, Documents::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-documents-supplier_id")
                            .from(Documents::Table, Documents::SupplierId)
                            .to(Suppliers::Table, Suppliers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DocumentItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DocumentItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DocumentItems::DocumentId).string().not_null())
                    .col(ColumnDef::new(DocumentItems::ItemId).string().not_null())
                    .col(ColumnDef::new(DocumentItems::LineNo).integer().not_null())
                    .col(ColumnDef::new(DocumentItems::Quantity).double().not_null())
                    .col(
                        ColumnDef::new(DocumentItems::UnitPrice)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-document_items-document_id")
                            .from(DocumentItems::Table, DocumentItems::DocumentId)
                            .to(Documents::Table, Documents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    // A stock item cannot be deleted while document lines
                    // reference it.
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-document_items-item_id")
                            .from(DocumentItems::Table, DocumentItems::ItemId)
                            .to(StockItems::Table, StockItems::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-document_items-document_id")
                    .table(DocumentItems::Table)
                    .col(DocumentItems::DocumentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-documents-store_id-document_date")
                    .table(Documents::Table)
                    .col(Documents::StoreId)
                    .col(Documents::DocumentDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DocumentItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Documents::Table).to_owned())
            .await
    }
}
