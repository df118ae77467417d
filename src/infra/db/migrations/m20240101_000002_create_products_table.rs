//! Migration: Create products table, owned by a user.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Products::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Products::Title).text().not_null().unique_key())
                    .col(ColumnDef::new(Products::Price).double().not_null().default(0.0))
                    .col(ColumnDef::new(Products::Description).text().null())
                    .col(ColumnDef::new(Products::Slug).text().not_null().unique_key())
                    .col(ColumnDef::new(Products::Stock).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Products::Sizes)
                            .array(ColumnType::Text)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Products::Gender).text().not_null())
                    .col(
                        ColumnDef::new(Products::Tags)
                            .array(ColumnType::Text)
                            .not_null()
                            .default(Expr::cust("ARRAY[]::text[]")),
                    )
                    .col(ColumnDef::new(Products::UserId).uuid().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_user_id")
                            .from(Products::Table, Products::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_user_id")
                    .table(Products::Table)
                    .col(Products::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Products {
    Table,
    Id,
    Title,
    Price,
    Description,
    Slug,
    Stock,
    Sizes,
    Gender,
    Tags,
    UserId,
}
