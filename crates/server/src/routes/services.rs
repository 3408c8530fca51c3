use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    http::StatusCode,
    Json,
};

use catalog::services::models::{CreateServiceRequest, ServiceListResponse, ServiceResponse, UpdateServiceRequest};

use crate::auth::{AuthUser, MaybeUserId};
use crate::errors::JsonApiError;
use crate::state::AppState;

#[utoipa::path(
    get, path = "/api/v1/companies/{company_id}/services", tag = "services",
    params(
        ("company_id" = i64, Path, description = "Company id"),
        ("X-User-ID" = Option<i64>, Header, description = "Optional caller id for personal prices")
    ),
    responses(
        (status = 200, description = "Services; price fields absent when pricing is unavailable", body = crate::openapi::ServiceListDoc),
        (status = 404, description = "Prices not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    MaybeUserId(user_id): MaybeUserId,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ServiceListResponse>, JsonApiError> {
    let Path(company_id) = path?;
    Ok(Json(state.services.list_by_company(company_id, user_id).await?))
}

#[utoipa::path(
    get, path = "/api/v1/companies/{company_id}/services/{service_id}", tag = "services",
    params(
        ("company_id" = i64, Path, description = "Company id"),
        ("service_id" = i64, Path, description = "Service id"),
        ("X-User-ID" = Option<i64>, Header, description = "Optional caller id for personal prices")
    ),
    responses(
        (status = 200, description = "Service", body = crate::openapi::ServiceDoc),
        (status = 404, description = "Service or prices not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    MaybeUserId(user_id): MaybeUserId,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<Json<ServiceResponse>, JsonApiError> {
    let Path((company_id, service_id)) = path?;
    Ok(Json(state.services.get_by_id(company_id, service_id, user_id).await?))
}

#[utoipa::path(
    post, path = "/api/v1/companies/{company_id}/services", tag = "services",
    request_body = crate::openapi::CreateServiceDoc,
    params(
        ("company_id" = i64, Path, description = "Company id"),
        ("X-User-ID" = i64, Header, description = "Caller id"),
        ("X-User-Role" = String, Header, description = "Caller role")
    ),
    responses(
        (status = 201, description = "Created", body = crate::openapi::ServiceDoc),
        (status = 400, description = "Validation Error or foreign address", body = crate::openapi::ErrorDoc),
        (status = 403, description = "Not a manager", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Company not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<CreateServiceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ServiceResponse>), JsonApiError> {
    let Path(company_id) = path?;
    let Json(req) = body?;
    let service = state.services.create(&caller, company_id, req).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

#[utoipa::path(
    put, path = "/api/v1/companies/{company_id}/services/{service_id}", tag = "services",
    request_body = crate::openapi::UpdateServiceDoc,
    params(
        ("company_id" = i64, Path, description = "Company id"),
        ("service_id" = i64, Path, description = "Service id"),
        ("X-User-ID" = i64, Header, description = "Caller id"),
        ("X-User-Role" = String, Header, description = "Caller role")
    ),
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ServiceDoc),
        (status = 400, description = "Validation Error or foreign address", body = crate::openapi::ErrorDoc),
        (status = 403, description = "Not a manager", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    path: Result<Path<(i64, i64)>, PathRejection>,
    body: Result<Json<UpdateServiceRequest>, JsonRejection>,
) -> Result<Json<ServiceResponse>, JsonApiError> {
    let Path((company_id, service_id)) = path?;
    let Json(req) = body?;
    Ok(Json(state.services.update(&caller, company_id, service_id, req).await?))
}

#[utoipa::path(
    delete, path = "/api/v1/companies/{company_id}/services/{service_id}", tag = "services",
    params(
        ("company_id" = i64, Path, description = "Company id"),
        ("service_id" = i64, Path, description = "Service id"),
        ("X-User-ID" = i64, Header, description = "Caller id"),
        ("X-User-Role" = String, Header, description = "Caller role")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not a manager", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<StatusCode, JsonApiError> {
    let Path((company_id, service_id)) = path?;
    state.services.delete(&caller, company_id, service_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
