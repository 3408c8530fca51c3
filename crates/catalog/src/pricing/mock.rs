//! Scripted price client for tests and doc examples.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::client::PriceClient;
use super::errors::PriceError;
use super::models::{CalculatePricesRequest, CalculatePricesResponse, ServicePrice};

#[derive(Clone, Debug)]
pub enum StubOutcome {
    Prices(Vec<ServicePrice>),
    NotFound,
    /// Behaves like a transport failure.
    Unavailable,
}

pub struct StubPriceClient {
    outcome: StubOutcome,
    calls: AtomicUsize,
    last_request: Mutex<Option<CalculatePricesRequest>>,
}

impl StubPriceClient {
    pub fn new(outcome: StubOutcome) -> Self {
        Self { outcome, calls: AtomicUsize::new(0), last_request: Mutex::new(None) }
    }

    pub fn with_prices(prices: Vec<ServicePrice>) -> Self { Self::new(StubOutcome::Prices(prices)) }

    pub fn not_found() -> Self { Self::new(StubOutcome::NotFound) }

    pub fn unavailable() -> Self { Self::new(StubOutcome::Unavailable) }

    pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

    pub fn last_request(&self) -> Option<CalculatePricesRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

/// Convenience constructor for a fully populated price entry.
pub fn price(service_id: i64, amount: f64) -> ServicePrice {
    ServicePrice {
        service_id,
        price: Some(amount),
        currency: Some("RUB".into()),
        pricing_type: Some("fixed".into()),
        vehicle_class: None,
        applied_multiplier: Some(1.0),
    }
}

#[async_trait]
impl PriceClient for StubPriceClient {
    async fn calculate_prices(&self, req: &CalculatePricesRequest) -> Result<CalculatePricesResponse, PriceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(req.clone());
        match &self.outcome {
            StubOutcome::Prices(prices) => Ok(CalculatePricesResponse {
                prices: prices.iter().filter(|p| req.service_ids.contains(&p.service_id)).cloned().collect(),
            }),
            StubOutcome::NotFound => Err(PriceError::PricesNotFound),
            StubOutcome::Unavailable => Err(PriceError::Internal("connection refused".into())),
        }
    }
}
