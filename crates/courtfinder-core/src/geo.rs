//! Coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Mean Earth radius used by the sphere approximation.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Downtown Vancouver, the initial map centre before any search.
pub const DEFAULT_MAP_CENTER: Coordinate = Coordinate {
    latitude: 49.282_7,
    longitude: -123.120_7,
};

/// A point in decimal degrees.
///
/// Construct through [`Coordinate::new`] to get range validation; the fields
/// stay public so already-validated values can be pattern matched freely.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate, rejecting values outside `[-90, 90]` /
    /// `[-180, 180]` and non-finite input.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CoordinateOutOfRange`] when either component is
    /// outside its valid range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lng_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
        if !(lat_ok && lng_ok) {
            return Err(CoreError::CoordinateOutOfRange {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Haversine distance between two points, in kilometres.
#[must_use]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}
