//! Create `service_addresses` link table.
//!
//! Both sides cascade: removing a service or an address removes the link,
//! so replacing a company's address set also drops the affected links.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceAddresses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ServiceAddresses::ServiceId).big_integer().not_null())
                    .col(ColumnDef::new(ServiceAddresses::AddressId).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(ServiceAddresses::ServiceId)
                            .col(ServiceAddresses::AddressId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_addresses_service")
                            .from(ServiceAddresses::Table, ServiceAddresses::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_addresses_address")
                            .from(ServiceAddresses::Table, ServiceAddresses::AddressId)
                            .to(Addresses::Table, Addresses::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceAddresses::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServiceAddresses { Table, ServiceId, AddressId }

#[derive(DeriveIden)]
enum Services { Table, Id }

#[derive(DeriveIden)]
enum Addresses { Table, Id }
