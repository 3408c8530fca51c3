use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculatePricesRequest {
    pub company_id: i64,
    /// Caller, for personalised prices; omitted for anonymous reads.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user_id: Option<i64>,
    pub service_ids: Vec<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct CalculatePricesResponse {
    #[serde(default)]
    pub prices: Vec<ServicePrice>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServicePrice {
    pub service_id: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pricing_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub vehicle_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub applied_multiplier: Option<f64>,
}

/// Error body returned by the price service on non-200 statuses.
#[derive(Clone, Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
