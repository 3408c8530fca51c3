//! Request/response shapes for companies and their conversions.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{self, Company, CreateCompanyInput, DaySchedule, TimeOfDay, UpdateCompanyInput, WorkingHours};
use crate::pagination::PageInfo;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinatesDto {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressRequest {
    /// Accepted for compatibility; addresses are always replaced as a set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub city: String,
    pub street: String,
    pub building: String,
    pub coordinates: CoordinatesDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressResponse {
    pub id: i64,
    pub city: String,
    pub street: String,
    pub building: String,
    pub coordinates: CoordinatesDto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DayScheduleDto {
    #[serde(rename = "isOpen")]
    pub is_open: bool,
    #[serde(rename = "openTime", default, skip_serializing_if = "Option::is_none")]
    pub open_time: Option<TimeOfDay>,
    #[serde(rename = "closeTime", default, skip_serializing_if = "Option::is_none")]
    pub close_time: Option<TimeOfDay>,
}

/// Missing days deserialize as closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkingHoursDto {
    #[serde(default)]
    pub monday: DayScheduleDto,
    #[serde(default)]
    pub tuesday: DayScheduleDto,
    #[serde(default)]
    pub wednesday: DayScheduleDto,
    #[serde(default)]
    pub thursday: DayScheduleDto,
    #[serde(default)]
    pub friday: DayScheduleDto,
    #[serde(default)]
    pub saturday: DayScheduleDto,
    #[serde(default)]
    pub sunday: DayScheduleDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCompanyRequest {
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub addresses: Vec<AddressRequest>,
    #[serde(default)]
    pub working_hours: WorkingHoursDto,
    #[serde(default)]
    pub manager_ids: Vec<i64>,
}

/// Absent (or `null`) fields stay unchanged; a present list, even `[]`, replaces.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateCompanyRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub addresses: Option<Vec<AddressRequest>>,
    #[serde(default)]
    pub working_hours: Option<WorkingHoursDto>,
    #[serde(default)]
    pub manager_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyResponse {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub addresses: Vec<AddressResponse>,
    pub working_hours: WorkingHoursDto,
    pub manager_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationResult {
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyListResponse {
    pub companies: Vec<CompanyResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationResult>,
}

impl From<DayScheduleDto> for DaySchedule {
    fn from(d: DayScheduleDto) -> Self {
        DaySchedule { is_open: d.is_open, open_time: d.open_time, close_time: d.close_time }
    }
}

impl From<DaySchedule> for DayScheduleDto {
    fn from(d: DaySchedule) -> Self {
        DayScheduleDto { is_open: d.is_open, open_time: d.open_time, close_time: d.close_time }
    }
}

impl From<WorkingHoursDto> for WorkingHours {
    fn from(w: WorkingHoursDto) -> Self {
        WorkingHours {
            monday: w.monday.into(),
            tuesday: w.tuesday.into(),
            wednesday: w.wednesday.into(),
            thursday: w.thursday.into(),
            friday: w.friday.into(),
            saturday: w.saturday.into(),
            sunday: w.sunday.into(),
        }
    }
}

impl From<WorkingHours> for WorkingHoursDto {
    fn from(w: WorkingHours) -> Self {
        WorkingHoursDto {
            monday: w.monday.into(),
            tuesday: w.tuesday.into(),
            wednesday: w.wednesday.into(),
            thursday: w.thursday.into(),
            friday: w.friday.into(),
            saturday: w.saturday.into(),
            sunday: w.sunday.into(),
        }
    }
}

impl From<AddressRequest> for domain::AddressInput {
    fn from(a: AddressRequest) -> Self {
        domain::AddressInput {
            city: a.city,
            street: a.street,
            building: a.building,
            coordinates: domain::Coordinates { latitude: a.coordinates.latitude, longitude: a.coordinates.longitude },
        }
    }
}

impl From<domain::Address> for AddressResponse {
    fn from(a: domain::Address) -> Self {
        AddressResponse {
            id: a.id,
            city: a.city,
            street: a.street,
            building: a.building,
            coordinates: CoordinatesDto { latitude: a.coordinates.latitude, longitude: a.coordinates.longitude },
        }
    }
}

impl From<CreateCompanyRequest> for CreateCompanyInput {
    fn from(r: CreateCompanyRequest) -> Self {
        CreateCompanyInput {
            name: r.name,
            logo: r.logo,
            description: r.description,
            tags: r.tags,
            addresses: r.addresses.into_iter().map(Into::into).collect(),
            working_hours: r.working_hours.into(),
            manager_ids: r.manager_ids,
        }
    }
}

impl From<UpdateCompanyRequest> for UpdateCompanyInput {
    fn from(r: UpdateCompanyRequest) -> Self {
        UpdateCompanyInput {
            name: r.name,
            logo: r.logo,
            description: r.description,
            tags: r.tags,
            addresses: r.addresses.map(|list| list.into_iter().map(Into::into).collect()),
            working_hours: r.working_hours.map(Into::into),
            manager_ids: r.manager_ids,
        }
    }
}

impl From<Company> for CompanyResponse {
    fn from(c: Company) -> Self {
        CompanyResponse {
            id: c.id,
            name: c.name,
            logo: c.logo,
            description: c.description,
            tags: c.tags,
            addresses: c.addresses.into_iter().map(Into::into).collect(),
            working_hours: c.working_hours.into(),
            manager_ids: c.manager_ids,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

impl From<PageInfo> for PaginationResult {
    fn from(p: PageInfo) -> Self {
        PaginationResult { page: p.page, limit: p.limit, total_pages: p.total_pages(), total_items: p.total }
    }
}

impl CompanyListResponse {
    pub fn new(companies: Vec<Company>, page: Option<PageInfo>) -> Self {
        CompanyListResponse {
            companies: companies.into_iter().map(Into::into).collect(),
            pagination: page.map(Into::into),
        }
    }
}
