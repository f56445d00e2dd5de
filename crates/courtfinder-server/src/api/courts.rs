use axum::{
    extract::{Query, State},
    Extension, Json,
};
use courtfinder_core::{nearby, Coordinate, CourtLocation, SearchRadius};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct NearbyCourtItem {
    #[serde(flatten)]
    location: CourtLocation,
    distance_km: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct NearbyQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius_km: Option<u32>,
}

pub(super) async fn list_courts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<CourtLocation>>> {
    Json(ApiResponse {
        data: state.directory.locations.clone(),
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn list_nearby_courts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<ApiResponse<Vec<NearbyCourtItem>>>, ApiError> {
    let (center, radius) = validate_nearby_query(&query)
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;

    let data: Vec<NearbyCourtItem> = nearby(&state.directory.locations, center, radius.km())
        .into_iter()
        .map(|(location, distance_km)| NearbyCourtItem {
            location: location.clone(),
            distance_km,
        })
        .collect();

    tracing::debug!(
        latitude = center.latitude,
        longitude = center.longitude,
        radius_km = u32::from(radius),
        matches = data.len(),
        "nearby courts filtered"
    );

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn validate_nearby_query(query: &NearbyQuery) -> Result<(Coordinate, SearchRadius), String> {
    let (Some(lat), Some(lng)) = (query.lat, query.lng) else {
        return Err("lat and lng are required".to_string());
    };
    let center = Coordinate::new(lat, lng).map_err(|e| e.to_string())?;
    let radius = match query.radius_km {
        None => SearchRadius::default(),
        Some(km) => SearchRadius::try_from(km).map_err(|e| e.to_string())?,
    };
    Ok((center, radius))
}
