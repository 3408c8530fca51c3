//! Client for the remote price calculator.
//!
//! `PriceClient::calculate_prices` is the strict call; the provided
//! `calculate_prices_with_graceful_degradation` keeps "prices not found"
//! as-is and folds every other failure into `PriceError::Degraded`.

pub mod client;
pub mod errors;
pub mod mock;
pub mod models;

pub use client::{HttpPriceClient, PriceClient};
pub use errors::PriceError;
pub use models::{CalculatePricesRequest, CalculatePricesResponse, ServicePrice};
