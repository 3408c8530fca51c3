//! OpenAPI document. Schemas here mirror the catalog DTOs for documentation only.
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

#[derive(ToSchema)]
pub struct ErrorDoc {
    pub code: u16,
    pub error: String,
    pub message: Option<String>,
}

#[derive(ToSchema)]
pub struct CoordinatesDoc {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(ToSchema)]
pub struct AddressInputDoc {
    pub city: String,
    pub street: String,
    pub building: String,
    pub coordinates: CoordinatesDoc,
}

#[derive(ToSchema)]
pub struct AddressDoc {
    pub id: i64,
    pub city: String,
    pub street: String,
    pub building: String,
    pub coordinates: CoordinatesDoc,
}

#[derive(ToSchema)]
pub struct DayScheduleDoc {
    #[schema(rename = "isOpen")]
    pub is_open: bool,
    #[schema(rename = "openTime", example = "09:00")]
    pub open_time: Option<String>,
    #[schema(rename = "closeTime", example = "21:00")]
    pub close_time: Option<String>,
}

#[derive(ToSchema)]
pub struct WorkingHoursDoc {
    pub monday: DayScheduleDoc,
    pub tuesday: DayScheduleDoc,
    pub wednesday: DayScheduleDoc,
    pub thursday: DayScheduleDoc,
    pub friday: DayScheduleDoc,
    pub saturday: DayScheduleDoc,
    pub sunday: DayScheduleDoc,
}

#[derive(ToSchema)]
pub struct CreateCompanyDoc {
    pub name: String,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub addresses: Vec<AddressInputDoc>,
    pub working_hours: WorkingHoursDoc,
    pub manager_ids: Vec<i64>,
}

/// Absent fields stay unchanged; a present list (even empty) replaces the stored one.
#[derive(ToSchema)]
pub struct UpdateCompanyDoc {
    pub name: Option<String>,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub addresses: Option<Vec<AddressInputDoc>>,
    pub working_hours: Option<WorkingHoursDoc>,
    pub manager_ids: Option<Vec<i64>>,
}

#[derive(ToSchema)]
pub struct CompanyDoc {
    pub id: i64,
    pub name: String,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub addresses: Vec<AddressDoc>,
    pub working_hours: WorkingHoursDoc,
    pub manager_ids: Vec<i64>,
    #[schema(example = "2024-05-01T10:00:00Z")]
    pub created_at: String,
    #[schema(example = "2024-05-01T10:00:00Z")]
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct PaginationDoc {
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

#[derive(ToSchema)]
pub struct CompanyListDoc {
    pub companies: Vec<CompanyDoc>,
    /// Present only when both `page` and `limit` were given.
    pub pagination: Option<PaginationDoc>,
}

#[derive(ToSchema)]
pub struct CreateServiceDoc {
    pub name: String,
    pub description: Option<String>,
    /// Minutes.
    pub average_duration: Option<i32>,
    pub address_ids: Vec<i64>,
}

#[derive(ToSchema)]
pub struct UpdateServiceDoc {
    pub name: Option<String>,
    pub description: Option<String>,
    pub average_duration: Option<i32>,
    /// `[]` unlinks every address.
    pub address_ids: Option<Vec<i64>>,
}

#[derive(ToSchema)]
pub struct ServiceDoc {
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub average_duration: Option<i32>,
    pub address_ids: Vec<i64>,
    #[schema(example = "2024-05-01T10:00:00Z")]
    pub created_at: String,
    #[schema(example = "2024-05-01T10:00:00Z")]
    pub updated_at: String,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub pricing_type: Option<String>,
    pub vehicle_class: Option<String>,
    pub applied_multiplier: Option<f64>,
}

#[derive(ToSchema)]
pub struct ServiceListDoc {
    pub services: Vec<ServiceDoc>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::companies::list,
        crate::routes::companies::get,
        crate::routes::companies::create,
        crate::routes::companies::update,
        crate::routes::companies::delete,
        crate::routes::services::list,
        crate::routes::services::get,
        crate::routes::services::create,
        crate::routes::services::update,
        crate::routes::services::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            CoordinatesDoc,
            AddressInputDoc,
            AddressDoc,
            DayScheduleDoc,
            WorkingHoursDoc,
            CreateCompanyDoc,
            UpdateCompanyDoc,
            CompanyDoc,
            PaginationDoc,
            CompanyListDoc,
            CreateServiceDoc,
            UpdateServiceDoc,
            ServiceDoc,
            ServiceListDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "companies"),
        (name = "services")
    )
)]
pub struct ApiDoc;
