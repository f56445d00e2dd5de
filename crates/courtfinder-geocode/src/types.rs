//! Geocoding response types.
//!
//! Only the fields the client reads are modelled; the proxy passes the full
//! upstream body through untouched.

use serde::Deserialize;

/// Top-level envelope: `{"status": "OK", "results": [...]}`.
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    /// `"OK"`, `"ZERO_RESULTS"`, or an error status such as `"REQUEST_DENIED"`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub formatted_address: Option<String>,
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}
