use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Extension,
};
use courtfinder_geocode::GeocodeError;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeQuery {
    pub address: Option<String>,
}

/// Forwards `address` to the upstream geocoder with the server-side key and
/// returns the upstream JSON byte for byte with a 200, including the
/// service's own error envelopes.
///
/// The key is checked before the address, so an unconfigured server answers
/// 500 to every request.
pub(super) async fn proxy_geocode(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Response, ApiError> {
    let Some(geocoder) = state.geocoder.as_ref() else {
        tracing::error!("geocode proxy called without a configured API key");
        return Err(ApiError::new(
            req_id.0,
            "config_error",
            "geocoding API key is not configured",
        ));
    };

    let address = query
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "bad_request", "address is required"))?;

    match geocoder.lookup_raw(address).await {
        Ok(body) => Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response()),
        Err(GeocodeError::EmptyAddress) => Err(ApiError::new(
            req_id.0,
            "bad_request",
            "address is required",
        )),
        Err(e) => {
            tracing::error!(error = %e, "upstream geocoding request failed");
            Err(ApiError::new(
                req_id.0,
                "upstream_error",
                "failed to fetch geocoding data",
            ))
        }
    }
}
