use sea_orm::DbErr;
use thiserror::Error;

/// Storage-layer errors shared by the company and service stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("company not found")]
    CompanyNotFound,
    #[error("service not found")]
    ServiceNotFound,
    #[error("addresses {address_ids:?} do not belong to company {company_id}")]
    ForeignAddress { company_id: i64, address_ids: Vec<i64> },
    #[error("integrity violation: {0}")]
    Integrity(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<DbErr> for StoreError {
    fn from(e: DbErr) -> Self { StoreError::Db(e.to_string()) }
}
