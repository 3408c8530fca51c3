use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Addresses: lookup by owner and the city filter sub-query
        manager
            .create_index(
                Index::create()
                    .name("idx_addresses_company")
                    .table(Addresses::Table)
                    .col(Addresses::CompanyId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_addresses_city")
                    .table(Addresses::Table)
                    .col(Addresses::City)
                    .to_owned(),
            )
            .await?;

        // Companies: newest-first listing
        manager
            .create_index(
                Index::create()
                    .name("idx_companies_created_at")
                    .table(Companies::Table)
                    .col(Companies::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Services: listing by company
        manager
            .create_index(
                Index::create()
                    .name("idx_services_company")
                    .table(Services::Table)
                    .col(Services::CompanyId)
                    .to_owned(),
            )
            .await?;

        // ServiceAddresses: reverse lookup for the address-side cascade
        manager
            .create_index(
                Index::create()
                    .name("idx_service_addresses_address")
                    .table(ServiceAddresses::Table)
                    .col(ServiceAddresses::AddressId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_addresses_company").table(Addresses::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_addresses_city").table(Addresses::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_companies_created_at").table(Companies::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_services_company").table(Services::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_addresses_address").table(ServiceAddresses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Addresses { Table, CompanyId, City }

#[derive(DeriveIden)]
enum Companies { Table, CreatedAt }

#[derive(DeriveIden)]
enum Services { Table, CompanyId }

#[derive(DeriveIden)]
enum ServiceAddresses { Table, AddressId }
