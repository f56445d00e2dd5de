mod courts;
mod geocode;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use courtfinder_core::CourtLocation;
use courtfinder_geocode::GeocodeClient;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

/// The directory as loaded at startup. Never mutated afterwards.
#[derive(Debug)]
pub struct DirectorySnapshot {
    pub locations: Vec<CourtLocation>,
    pub available: bool,
}

impl DirectorySnapshot {
    #[must_use]
    pub fn ready(locations: Vec<CourtLocation>) -> Self {
        Self {
            locations,
            available: true,
        }
    }

    /// Stand-in used when the startup fetch failed.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            locations: Vec::new(),
            available: false,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<DirectorySnapshot>,
    /// Upstream geocoder holding the server-side key; `None` when no key is
    /// configured.
    pub geocoder: Option<Arc<GeocodeClient>>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    directory: &'static str,
    locations: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn geocode_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/geocode", get(geocode::proxy_geocode))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/courts", get(courts::list_courts))
        .route("/api/v1/courts/nearby", get(courts::list_nearby_courts));

    Router::new()
        .merge(public_routes)
        .merge(geocode_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);
    let locations = state.directory.locations.len();

    if state.directory.available {
        (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    directory: "ok",
                    locations,
                },
                meta,
            }),
        )
    } else {
        tracing::warn!("health check: court directory unavailable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse {
                data: HealthData {
                    status: "degraded",
                    directory: "unavailable",
                    locations,
                },
                meta,
            }),
        )
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
