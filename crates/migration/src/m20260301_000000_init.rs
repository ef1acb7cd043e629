//! Initial schema: the `ingredients` catalog table.
//!
//! `price` is kept as text so the stored decimal is exactly what the engine
//! wrote (two fractional digits, price per one `dimension`).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Ingredients {
    Table,
    Id,
    Name,
    NameNorm,
    Description,
    Price,
    Dimension,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ingredients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Ingredients::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Ingredients::Name).string().not_null())
                    .col(ColumnDef::new(Ingredients::NameNorm).string().not_null())
                    .col(ColumnDef::new(Ingredients::Description).string())
                    .col(ColumnDef::new(Ingredients::Price).string().not_null())
                    .col(ColumnDef::new(Ingredients::Dimension).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ingredients-name_norm-unique")
                    .table(Ingredients::Table)
                    .col(Ingredients::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Ingredients::Table).to_owned())
            .await?;
        Ok(())
    }
}
