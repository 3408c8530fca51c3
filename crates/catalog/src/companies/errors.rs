use thiserror::Error;

use crate::errors::StoreError;

/// Business errors for company workflows
#[derive(Debug, Error)]
pub enum CompanyError {
    #[error("company not found")]
    NotFound,
    #[error("access denied: caller does not manage this company")]
    AccessDenied,
    #[error("only superuser can perform this action")]
    SuperuserRequired,
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for CompanyError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::CompanyNotFound => CompanyError::NotFound,
            other => CompanyError::Internal(other.to_string()),
        }
    }
}
