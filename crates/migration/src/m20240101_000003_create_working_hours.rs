//! Create `working_hours` table.
//!
//! Exactly one row per company (company_id is the primary key); seven
//! day schedules are flattened into `<day>_is_open`, `<day>_open_time`,
//! `<day>_close_time` columns.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkingHours::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WorkingHours::CompanyId).big_integer().not_null().primary_key())
                    .col(ColumnDef::new(WorkingHours::MondayIsOpen).boolean().not_null().default(false))
                    .col(ColumnDef::new(WorkingHours::MondayOpenTime).time().null())
                    .col(ColumnDef::new(WorkingHours::MondayCloseTime).time().null())
                    .col(ColumnDef::new(WorkingHours::TuesdayIsOpen).boolean().not_null().default(false))
                    .col(ColumnDef::new(WorkingHours::TuesdayOpenTime).time().null())
                    .col(ColumnDef::new(WorkingHours::TuesdayCloseTime).time().null())
                    .col(ColumnDef::new(WorkingHours::WednesdayIsOpen).boolean().not_null().default(false))
                    .col(ColumnDef::new(WorkingHours::WednesdayOpenTime).time().null())
                    .col(ColumnDef::new(WorkingHours::WednesdayCloseTime).time().null())
                    .col(ColumnDef::new(WorkingHours::ThursdayIsOpen).boolean().not_null().default(false))
                    .col(ColumnDef::new(WorkingHours::ThursdayOpenTime).time().null())
                    .col(ColumnDef::new(WorkingHours::ThursdayCloseTime).time().null())
                    .col(ColumnDef::new(WorkingHours::FridayIsOpen).boolean().not_null().default(false))
                    .col(ColumnDef::new(WorkingHours::FridayOpenTime).time().null())
                    .col(ColumnDef::new(WorkingHours::FridayCloseTime).time().null())
                    .col(ColumnDef::new(WorkingHours::SaturdayIsOpen).boolean().not_null().default(false))
                    .col(ColumnDef::new(WorkingHours::SaturdayOpenTime).time().null())
                    .col(ColumnDef::new(WorkingHours::SaturdayCloseTime).time().null())
                    .col(ColumnDef::new(WorkingHours::SundayIsOpen).boolean().not_null().default(false))
                    .col(ColumnDef::new(WorkingHours::SundayOpenTime).time().null())
                    .col(ColumnDef::new(WorkingHours::SundayCloseTime).time().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_working_hours_company")
                            .from(WorkingHours::Table, WorkingHours::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(WorkingHours::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum WorkingHours {
    Table,
    CompanyId,
    MondayIsOpen, MondayOpenTime, MondayCloseTime, TuesdayIsOpen, TuesdayOpenTime, TuesdayCloseTime, WednesdayIsOpen, WednesdayOpenTime, WednesdayCloseTime, ThursdayIsOpen, ThursdayOpenTime, ThursdayCloseTime, FridayIsOpen, FridayOpenTime, FridayCloseTime, SaturdayIsOpen, SaturdayOpenTime, SaturdayCloseTime, SundayIsOpen, SundayOpenTime, SundayCloseTime,
}

#[derive(DeriveIden)]
enum Companies { Table, Id }
