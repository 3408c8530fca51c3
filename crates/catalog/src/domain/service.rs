use chrono::{DateTime, Utc};

/// A service offered by a company. Prices are not part of the stored record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Service {
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Minutes.
    pub average_duration: Option<i32>,
    pub address_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateServiceInput {
    pub name: String,
    pub description: Option<String>,
    pub average_duration: Option<i32>,
    pub address_ids: Vec<i64>,
}

/// Partial update; `address_ids: Some(vec![])` unlinks every address.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct UpdateServiceInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub average_duration: Option<i32>,
    pub address_ids: Option<Vec<i64>>,
}
