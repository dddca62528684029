//! Create `customers` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(big_integer(Customers::Id).auto_increment().primary_key())
                    .col(text(Customers::Name))
                    .col(text(Customers::Address))
                    .col(text(Customers::TaxId))
                    .col(text(Customers::Email))
                    .col(text(Customers::PhoneNumber))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Customers::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Customers { Table, Id, Name, Address, TaxId, Email, PhoneNumber }
