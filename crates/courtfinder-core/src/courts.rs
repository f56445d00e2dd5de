use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::CoreError;

/// Placeholder shown when a location record carries no address.
pub const DEFAULT_ADDRESS: &str = "No address available";

/// One physical site with one or more playing surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtLocation {
    /// Stable identifier, unique within a single directory fetch.
    pub location_id: String,
    pub name: String,
    /// Human-readable address, or [`DEFAULT_ADDRESS`].
    pub address: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub courts: Vec<Court>,
}

impl CourtLocation {
    /// Number of playing surfaces at this location.
    #[must_use]
    pub fn court_count(&self) -> usize {
        self.courts.len()
    }
}

/// One playing surface within a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    pub court_id: String,
    #[serde(default)]
    pub queue: Vec<QueueEntry>,
    /// When the current occupant began play, as sent by the directory.
    #[serde(default)]
    pub start_time: Option<String>,
}

/// A player waiting for a court. Carried through from the directory as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    pub join_time: String,
    pub player_id: String,
    pub phone_number: String,
}

/// The search radii offered to users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SearchRadius {
    Two,
    #[default]
    Five,
    Ten,
    Twenty,
}

impl SearchRadius {
    pub const ALL: [SearchRadius; 4] = [Self::Two, Self::Five, Self::Ten, Self::Twenty];

    #[must_use]
    pub fn km(self) -> f64 {
        f64::from(u32::from(self))
    }
}

impl TryFrom<u32> for SearchRadius {
    type Error = CoreError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::Two),
            5 => Ok(Self::Five),
            10 => Ok(Self::Ten),
            20 => Ok(Self::Twenty),
            other => Err(CoreError::UnsupportedRadius(other)),
        }
    }
}

impl From<SearchRadius> for u32 {
    fn from(radius: SearchRadius) -> Self {
        match radius {
            SearchRadius::Two => 2,
            SearchRadius::Five => 5,
            SearchRadius::Ten => 10,
            SearchRadius::Twenty => 20,
        }
    }
}

impl std::fmt::Display for SearchRadius {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} km", u32::from(*self))
    }
}

impl std::str::FromStr for SearchRadius {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let km = s
            .trim()
            .trim_end_matches("km")
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid radius '{s}': {e}"))?;
        Self::try_from(km).map_err(|e| e.to_string())
    }
}
