use thiserror::Error;

/// Errors returned by the geocoding client.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Network or TLS failure from the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status whose body is not JSON.
    #[error("geocoding service returned HTTP {0}")]
    UpstreamStatus(u16),

    /// The service answered with a status other than `OK` / `ZERO_RESULTS`.
    #[error("geocoding API error: {0}")]
    ApiError(String),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("address must not be empty")]
    EmptyAddress,

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("geocoder returned an out-of-range coordinate ({lat}, {lng})")]
    InvalidCoordinate { lat: f64, lng: f64 },
}
