use axum::{
    extract::{rejection::{JsonRejection, PathRejection, QueryRejection}, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use catalog::companies::models::{CompanyListResponse, CompanyResponse, CreateCompanyRequest, UpdateCompanyRequest};
use catalog::domain::CompanyFilter;
use catalog::pagination::Pagination;

use crate::auth::AuthUser;
use crate::errors::JsonApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CompanyListQuery {
    /// Comma-separated; matches companies sharing any tag.
    pub tags: Option<String>,
    /// Matches companies with an address in this city.
    pub city: Option<String>,
    /// 1-based; applied only together with `limit`.
    pub page: Option<u64>,
    /// 1..=100; applied only together with `page`.
    pub limit: Option<u64>,
}

impl CompanyListQuery {
    pub fn into_filter(self) -> CompanyFilter {
        let tags = self
            .tags
            .map(|raw| raw.split(',').map(str::trim).filter(|t| !t.is_empty()).map(String::from).collect())
            .unwrap_or_default();
        let city = self.city.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        CompanyFilter { tags, city, pagination: Pagination::from_parts(self.page, self.limit) }
    }
}

#[utoipa::path(
    get, path = "/api/v1/companies", tag = "companies",
    params(CompanyListQuery),
    responses(
        (status = 200, description = "Companies, newest first", body = crate::openapi::CompanyListDoc),
        (status = 400, description = "Invalid pagination", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<CompanyListQuery>, QueryRejection>,
) -> Result<Json<CompanyListResponse>, JsonApiError> {
    let Query(q) = query?;
    let resp = state.companies.list(q.into_filter()).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get, path = "/api/v1/companies/{company_id}", tag = "companies",
    params(("company_id" = i64, Path, description = "Company id")),
    responses(
        (status = 200, description = "Company aggregate", body = crate::openapi::CompanyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<CompanyResponse>, JsonApiError> {
    let Path(id) = path?;
    Ok(Json(state.companies.get_by_id(id).await?))
}

#[utoipa::path(
    post, path = "/api/v1/companies", tag = "companies",
    request_body = crate::openapi::CreateCompanyDoc,
    params(
        ("X-User-ID" = i64, Header, description = "Caller id"),
        ("X-User-Role" = String, Header, description = "Caller role; must be superuser")
    ),
    responses(
        (status = 201, description = "Created", body = crate::openapi::CompanyDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 401, description = "Missing identity", body = crate::openapi::ErrorDoc),
        (status = 403, description = "Superuser required", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    body: Result<Json<CreateCompanyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CompanyResponse>), JsonApiError> {
    let Json(req) = body?;
    let company = state.companies.create(&caller, req).await?;
    info!(company_id = company.id, user_id = caller.user_id, "company_create_request");
    Ok((StatusCode::CREATED, Json(company)))
}

#[utoipa::path(
    put, path = "/api/v1/companies/{company_id}", tag = "companies",
    request_body = crate::openapi::UpdateCompanyDoc,
    params(
        ("company_id" = i64, Path, description = "Company id"),
        ("X-User-ID" = i64, Header, description = "Caller id"),
        ("X-User-Role" = String, Header, description = "Caller role")
    ),
    responses(
        (status = 200, description = "Updated", body = crate::openapi::CompanyDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 403, description = "Not a manager", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateCompanyRequest>, JsonRejection>,
) -> Result<Json<CompanyResponse>, JsonApiError> {
    let Path(id) = path?;
    let Json(req) = body?;
    Ok(Json(state.companies.update(&caller, id, req).await?))
}

#[utoipa::path(
    delete, path = "/api/v1/companies/{company_id}", tag = "companies",
    params(
        ("company_id" = i64, Path, description = "Company id"),
        ("X-User-ID" = i64, Header, description = "Caller id"),
        ("X-User-Role" = String, Header, description = "Caller role; must be superuser")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Superuser required", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, JsonApiError> {
    let Path(id) = path?;
    state.companies.delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
