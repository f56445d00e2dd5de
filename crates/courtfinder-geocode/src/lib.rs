pub mod client;
pub mod error;
pub mod types;

pub use client::{GeocodeClient, DEFAULT_BASE_URL};
pub use error::GeocodeError;
pub use types::{GeocodeResponse, GeocodeResult};
