use std::time::Duration;

use async_trait::async_trait;
use common::metrics::PRICE_REQUESTS_TOTAL;
use reqwest::StatusCode;
use tracing::{error, info};

use super::errors::PriceError;
use super::models::{CalculatePricesRequest, CalculatePricesResponse, ErrorResponse};

#[async_trait]
pub trait PriceClient: Send + Sync {
    /// Ask the price service for prices; every failure is returned as-is.
    async fn calculate_prices(&self, req: &CalculatePricesRequest) -> Result<CalculatePricesResponse, PriceError>;

    /// Like `calculate_prices`, but anything other than `PricesNotFound`
    /// becomes `PriceError::Degraded` carrying the original cause.
    ///
    /// # Examples
    /// ```
    /// use catalog::pricing::{PriceClient, PriceError, CalculatePricesRequest};
    /// use catalog::pricing::mock::StubPriceClient;
    /// let client = StubPriceClient::unavailable();
    /// let req = CalculatePricesRequest { company_id: 1, user_id: None, service_ids: vec![10] };
    /// let err = tokio_test::block_on(client.calculate_prices_with_graceful_degradation(&req)).unwrap_err();
    /// assert!(matches!(err, PriceError::Degraded { company_id: 1, .. }));
    /// ```
    async fn calculate_prices_with_graceful_degradation(
        &self,
        req: &CalculatePricesRequest,
    ) -> Result<CalculatePricesResponse, PriceError> {
        match req.user_id {
            Some(user_id) => info!(company_id = req.company_id, user_id, services = ?req.service_ids, "calculating prices"),
            None => info!(company_id = req.company_id, services = ?req.service_ids, "calculating base prices"),
        }

        match self.calculate_prices(req).await {
            Ok(resp) => {
                PRICE_REQUESTS_TOTAL.with_label_values(&["ok"]).inc();
                info!(company_id = req.company_id, count = resp.prices.len(), "prices calculated");
                Ok(resp)
            }
            Err(PriceError::PricesNotFound) => {
                PRICE_REQUESTS_TOTAL.with_label_values(&["not_found"]).inc();
                info!(company_id = req.company_id, services = ?req.service_ids, "prices not found");
                Err(PriceError::PricesNotFound)
            }
            Err(e) => {
                PRICE_REQUESTS_TOTAL.with_label_values(&["degraded"]).inc();
                error!(company_id = req.company_id, error = %e, "price service unavailable, applying graceful degradation");
                Err(PriceError::Degraded { company_id: req.company_id, source: Box::new(e) })
            }
        }
    }
}

/// `reqwest`-backed client. `base_url` is the API root the
/// `/prices/calculate` path is appended to.
#[derive(Clone, Debug)]
pub struct HttpPriceClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpPriceClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, PriceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PriceError::Internal(format!("build http client: {e}")))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, http })
    }

    pub fn endpoint(&self) -> String { format!("{}/prices/calculate", self.base_url) }
}

#[async_trait]
impl PriceClient for HttpPriceClient {
    async fn calculate_prices(&self, req: &CalculatePricesRequest) -> Result<CalculatePricesResponse, PriceError> {
        let resp = self
            .http
            .post(self.endpoint())
            .json(req)
            .send()
            .await
            .map_err(|e| PriceError::Internal(format!("execute request: {e}")))?;

        match resp.status() {
            StatusCode::OK => resp
                .json::<CalculatePricesResponse>()
                .await
                .map_err(|e| PriceError::InvalidResponse(format!("decode response: {e}"))),
            StatusCode::BAD_REQUEST => {
                let detail = resp
                    .json::<ErrorResponse>()
                    .await
                    .map(|b| b.error)
                    .unwrap_or_else(|_| "no details".to_string());
                Err(PriceError::InvalidResponse(format!("bad request: {detail}")))
            }
            StatusCode::NOT_FOUND => Err(PriceError::PricesNotFound),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(PriceError::InvalidResponse(format!("unexpected status code {}: {}", status.as_u16(), body)))
            }
        }
    }
}
