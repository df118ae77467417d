//! Migration: Create product_images table.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_products_table::Products;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductImages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductImages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProductImages::Url).text().not_null())
                    .col(ColumnDef::new(ProductImages::ProductId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_images_product_id")
                            .from(ProductImages::Table, ProductImages::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Relation loading filters on product_id
        manager
            .create_index(
                Index::create()
                    .name("idx_product_images_product_id")
                    .table(ProductImages::Table)
                    .col(ProductImages::ProductId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductImages::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ProductImages {
    Table,
    Id,
    Url,
    ProductId,
}
