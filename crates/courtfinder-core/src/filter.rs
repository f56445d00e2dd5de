//! Proximity filtering over a loaded directory.
//!
//! Both functions are pure: they read the directory slice and return a new
//! collection in the directory's original order. The radius boundary is
//! inclusive, so a location sitting exactly on the reference point always
//! matches, even with a radius of zero.

use crate::courts::CourtLocation;
use crate::geo::{haversine_km, Coordinate};

/// Returns the locations within `radius_km` of `center`, in directory order.
#[must_use]
pub fn filter_by_distance(
    directory: &[CourtLocation],
    center: Coordinate,
    radius_km: f64,
) -> Vec<CourtLocation> {
    directory
        .iter()
        .filter(|location| haversine_km(center, location.coordinate) <= radius_km)
        .cloned()
        .collect()
}

/// Like [`filter_by_distance`] but borrows each match and pairs it with its
/// distance from `center` in kilometres.
#[must_use]
pub fn nearby(
    directory: &[CourtLocation],
    center: Coordinate,
    radius_km: f64,
) -> Vec<(&CourtLocation, f64)> {
    directory
        .iter()
        .map(|location| (location, haversine_km(center, location.coordinate)))
        .filter(|(_, distance)| *distance <= radius_km)
        .collect()
}
