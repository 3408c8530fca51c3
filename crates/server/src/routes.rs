use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::metrics::{encode_metrics, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION};
use common::types::Health;
use configs::MetricsConfig;

use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod companies;
pub mod services;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is alive", body = crate::openapi::HealthResponse)))]
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health { status: "ok", service: state.service_name.to_string() })
}

async fn metrics() -> impl IntoResponse {
    encode_metrics()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Count and time every request, labelled by route template rather than raw path.
async fn track_metrics(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let start = Instant::now();

    let resp = next.run(req).await;

    let status = resp.status().as_u16().to_string();
    HTTP_REQUESTS_TOTAL.with_label_values(&[method.as_str(), path.as_str(), status.as_str()]).inc();
    HTTP_REQUEST_DURATION
        .with_label_values(&[method.as_str(), path.as_str()])
        .observe(start.elapsed().as_secs_f64());
    resp
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Versioned catalog API.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/companies", get(companies::list).post(companies::create))
        .route(
            "/companies/:company_id",
            get(companies::get).put(companies::update).delete(companies::delete),
        )
        .route(
            "/companies/:company_id/services",
            get(services::list).post(services::create),
        )
        .route(
            "/companies/:company_id/services/:service_id",
            get(services::get).put(services::update).delete(services::delete),
        )
}

/// Build the full application router: health, docs, optional metrics and `/api/v1`.
pub fn build_router(state: AppState, metrics_cfg: &MetricsConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api/v1", api_routes());
    if metrics_cfg.enabled {
        router = router.route(&metrics_cfg.path, get(metrics));
    }

    router
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(track_metrics))
        .layer(CorsLayer::very_permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
