use chrono::{DateTime, Utc};

use super::address::{Address, AddressInput};
use super::working_hours::WorkingHours;
use crate::pagination::Pagination;

/// Company aggregate: the company row plus its addresses and working hours.
#[derive(Clone, Debug, PartialEq)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub addresses: Vec<Address>,
    pub working_hours: WorkingHours,
    pub manager_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    pub fn is_managed_by(&self, user_id: i64) -> bool { self.manager_ids.contains(&user_id) }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CreateCompanyInput {
    pub name: String,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub addresses: Vec<AddressInput>,
    pub working_hours: WorkingHours,
    pub manager_ids: Vec<i64>,
}

/// Partial update. `None` leaves the stored value alone; a present
/// collection (even an empty one) replaces the stored one.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct UpdateCompanyInput {
    pub name: Option<String>,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub addresses: Option<Vec<AddressInput>>,
    pub working_hours: Option<WorkingHours>,
    pub manager_ids: Option<Vec<i64>>,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct CompanyFilter {
    /// Matches companies sharing at least one tag.
    pub tags: Vec<String>,
    /// Matches companies with at least one address in this city.
    pub city: Option<String>,
    pub pagination: Option<Pagination>,
}
