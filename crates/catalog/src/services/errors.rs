use thiserror::Error;

use crate::errors::StoreError;
use crate::pricing::PriceError;

/// Business errors for service workflows
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service not found")]
    ServiceNotFound,
    #[error("company not found")]
    CompanyNotFound,
    #[error("access denied: caller does not manage this company")]
    AccessDenied,
    #[error("invalid reference: {0}")]
    InvalidReference(String),
    #[error("prices not found for services")]
    PricesNotFound,
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::ServiceNotFound => ServiceError::ServiceNotFound,
            StoreError::CompanyNotFound => ServiceError::CompanyNotFound,
            StoreError::ForeignAddress { company_id, address_ids } => ServiceError::InvalidReference(format!(
                "addresses {address_ids:?} do not belong to company {company_id}"
            )),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<PriceError> for ServiceError {
    fn from(e: PriceError) -> Self {
        match e {
            PriceError::PricesNotFound => ServiceError::PricesNotFound,
            other => ServiceError::Internal(other.to_string()),
        }
    }
}
