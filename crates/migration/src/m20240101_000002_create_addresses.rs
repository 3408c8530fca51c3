//! Create `addresses` table with FK to `companies`.
//!
//! Addresses are owned by exactly one company and vanish with it.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Addresses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Addresses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Addresses::CompanyId).big_integer().not_null())
                    .col(ColumnDef::new(Addresses::City).string_len(128).not_null())
                    .col(ColumnDef::new(Addresses::Street).string_len(255).not_null())
                    .col(ColumnDef::new(Addresses::Building).string_len(64).not_null())
                    .col(ColumnDef::new(Addresses::Latitude).double().not_null())
                    .col(ColumnDef::new(Addresses::Longitude).double().not_null())
                    .col(
                        ColumnDef::new(Addresses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Addresses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_addresses_company")
                            .from(Addresses::Table, Addresses::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Addresses::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Addresses { Table, Id, CompanyId, City, Street, Building, Latitude, Longitude, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Companies { Table, Id }
