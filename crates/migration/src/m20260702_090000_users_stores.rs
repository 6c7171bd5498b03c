use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Users {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
pub enum Stores {
    Table,
    Id,
    Name,
    Address,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum StoreMembers {
    Table,
    StoreId,
    UserId,
    Role,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Stores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Stores::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Stores::Name).string().not_null())
                    .col(ColumnDef::new(Stores::Address).string())
                    .col(ColumnDef::new(Stores::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Stores::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StoreMembers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(StoreMembers::StoreId).string().not_null())
                    .col(ColumnDef::new(StoreMembers::UserId).string().not_null())
                    .col(ColumnDef::new(StoreMembers::Role).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(StoreMembers::StoreId)
                            .col(StoreMembers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-store_members-store_id")
                            .from(StoreMembers::Table, StoreMembers::StoreId)
                            .to(Stores::Table, Stores::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-store_members-user_id")
                            .from(StoreMembers::Table, StoreMembers::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StoreMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Stores::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}
