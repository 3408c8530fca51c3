use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use catalog::companies::CompanyError;
use catalog::services::ServiceError;

/// Error body shared by every endpoint: `{"code", "error", "message"}`.
#[derive(Debug, Error)]
#[error("{status}: {error}")]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: String,
    pub message: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: u16,
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, message: Option<String>) -> Self {
        Self { status, error: error.into(), message }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", Some(message.into()))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(message.into()))
    }

    /// Logs the cause; the client only sees a generic message.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        error!(error = %cause, "internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some("internal server error".into()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { code: self.status.as_u16(), error: &self.error, message: self.message.as_deref() };
        (self.status, Json(body)).into_response()
    }
}

impl From<CompanyError> for JsonApiError {
    fn from(e: CompanyError) -> Self {
        match e {
            CompanyError::NotFound => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(e.to_string())),
            CompanyError::AccessDenied | CompanyError::SuperuserRequired => {
                Self::new(StatusCode::FORBIDDEN, "Forbidden", Some(e.to_string()))
            }
            CompanyError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg)),
            CompanyError::Internal(cause) => Self::internal(cause),
        }
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::ServiceNotFound | ServiceError::CompanyNotFound | ServiceError::PricesNotFound => {
                Self::new(StatusCode::NOT_FOUND, "Not Found", Some(e.to_string()))
            }
            ServiceError::AccessDenied => Self::new(StatusCode::FORBIDDEN, "Forbidden", Some(e.to_string())),
            ServiceError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg)),
            ServiceError::InvalidReference(msg) => Self::new(StatusCode::BAD_REQUEST, "Invalid Reference", Some(msg)),
            ServiceError::Internal(cause) => Self::internal(cause),
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(e: JsonRejection) -> Self { Self::new(StatusCode::BAD_REQUEST, "Invalid Request Body", Some(e.body_text())) }
}

impl From<PathRejection> for JsonApiError {
    fn from(e: PathRejection) -> Self { Self::new(StatusCode::BAD_REQUEST, "Invalid Path", Some(e.body_text())) }
}

impl From<QueryRejection> for JsonApiError {
    fn from(e: QueryRejection) -> Self { Self::new(StatusCode::BAD_REQUEST, "Invalid Query", Some(e.body_text())) }
}
