pub mod app_config;
pub mod config;
pub mod courts;
pub mod filter;
pub mod geo;
pub mod session;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use courts::{Court, CourtLocation, QueueEntry, SearchRadius, DEFAULT_ADDRESS};
pub use filter::{filter_by_distance, nearby};
pub use geo::{haversine_km, Coordinate, DEFAULT_MAP_CENTER, EARTH_RADIUS_KM};
pub use session::{DirectoryStatus, SearchApplied, SearchTicket, SessionState};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("coordinate out of range: latitude {latitude}, longitude {longitude}")]
    CoordinateOutOfRange { latitude: f64, longitude: f64 },

    #[error("unsupported search radius: {0} km (expected 2, 5, 10 or 20)")]
    UnsupportedRadius(u32),
}
