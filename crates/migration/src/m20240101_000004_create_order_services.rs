//! Create `order_services` join table.
//!
//! One row per (order, service) pair; removing either parent removes the pair.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrderServices::Table)
                    .if_not_exists()
                    .col(big_integer(OrderServices::OrderId))
                    .col(big_integer(OrderServices::ServiceId))
                    .primary_key(
                        Index::create()
                            .name("pk_order_services")
                            .col(OrderServices::OrderId)
                            .col(OrderServices::ServiceId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_services_order")
                            .from(OrderServices::Table, OrderServices::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_services_service")
                            .from(OrderServices::Table, OrderServices::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(OrderServices::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum OrderServices { Table, OrderId, ServiceId }

#[derive(DeriveIden)]
enum Orders { Table, Id }

#[derive(DeriveIden)]
enum Services { Table, Id }
