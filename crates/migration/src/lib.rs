//! Migrator registering catalog migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_companies;
mod m20240101_000002_create_addresses;
mod m20240101_000003_create_working_hours;
mod m20240101_000004_create_services;
mod m20240101_000005_create_service_addresses;
mod m20240101_000006_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_companies::Migration),
            Box::new(m20240101_000002_create_addresses::Migration),
            Box::new(m20240101_000003_create_working_hours::Migration),
            Box::new(m20240101_000004_create_services::Migration),
            Box::new(m20240101_000005_create_service_addresses::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000006_add_indexes::Migration),
        ]
    }
}
