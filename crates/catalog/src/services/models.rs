//! Request/response shapes for services.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CreateServiceInput, Service, UpdateServiceInput};
use crate::pricing::ServicePrice;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_duration: Option<i32>,
    #[serde(default)]
    pub address_ids: Vec<i64>,
}

/// `address_ids` absent keeps the links; `[]` removes them all.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateServiceRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_duration: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_ids: Option<Vec<i64>>,
}

/// Service record, optionally carrying the price the caller would pay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_duration: Option<i32>,
    pub address_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_multiplier: Option<f64>,
}

impl ServiceResponse {
    pub fn enrich_with_price(&mut self, p: &ServicePrice) {
        self.price = p.price;
        self.currency = p.currency.clone();
        self.pricing_type = p.pricing_type.clone();
        self.vehicle_class = p.vehicle_class.clone();
        self.applied_multiplier = p.applied_multiplier;
    }

    pub fn is_priced(&self) -> bool { self.price.is_some() }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceListResponse {
    pub services: Vec<ServiceResponse>,
}

impl From<CreateServiceRequest> for CreateServiceInput {
    fn from(r: CreateServiceRequest) -> Self {
        CreateServiceInput {
            name: r.name,
            description: r.description,
            average_duration: r.average_duration,
            address_ids: r.address_ids,
        }
    }
}

impl From<UpdateServiceRequest> for UpdateServiceInput {
    fn from(r: UpdateServiceRequest) -> Self {
        UpdateServiceInput {
            name: r.name,
            description: r.description,
            average_duration: r.average_duration,
            address_ids: r.address_ids,
        }
    }
}

impl From<Service> for ServiceResponse {
    fn from(s: Service) -> Self {
        ServiceResponse {
            id: s.id,
            company_id: s.company_id,
            name: s.name,
            description: s.description,
            average_duration: s.average_duration,
            address_ids: s.address_ids,
            created_at: s.created_at,
            updated_at: s.updated_at,
            price: None,
            currency: None,
            pricing_type: None,
            vehicle_class: None,
            applied_multiplier: None,
        }
    }
}

impl From<Vec<Service>> for ServiceListResponse {
    fn from(list: Vec<Service>) -> Self {
        ServiceListResponse { services: list.into_iter().map(Into::into).collect() }
    }
}
