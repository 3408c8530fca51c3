use chrono::{DateTime, Utc};

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Address owned by exactly one company.
#[derive(Clone, Debug, PartialEq)]
pub struct Address {
    pub id: i64,
    pub company_id: i64,
    pub city: String,
    pub street: String,
    pub building: String,
    pub coordinates: Coordinates,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AddressInput {
    pub city: String,
    pub street: String,
    pub building: String,
    pub coordinates: Coordinates,
}

impl AddressInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.city.trim().is_empty() {
            return Err("address city is required".into());
        }
        if self.street.trim().is_empty() {
            return Err("address street is required".into());
        }
        if !(-90.0..=90.0).contains(&self.coordinates.latitude)
            || !(-180.0..=180.0).contains(&self.coordinates.longitude)
        {
            return Err("address coordinates out of range".into());
        }
        Ok(())
    }
}
