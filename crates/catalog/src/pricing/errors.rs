use thiserror::Error;

#[derive(Debug, Error)]
pub enum PriceError {
    /// No prices exist for the requested services. Business-meaningful, always propagated.
    #[error("prices not found for services")]
    PricesNotFound,
    #[error("price client internal error: {0}")]
    Internal(String),
    #[error("invalid response from price service: {0}")]
    InvalidResponse(String),
    #[error("price service unavailable for company {company_id}, serving without prices: {source}")]
    Degraded {
        company_id: i64,
        source: Box<PriceError>,
    },
}

impl PriceError {
    pub fn is_degraded(&self) -> bool { matches!(self, PriceError::Degraded { .. }) }
}
