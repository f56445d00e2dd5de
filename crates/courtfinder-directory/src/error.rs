use thiserror::Error;

/// Errors that abort a whole directory load.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Network or TLS failure, or a non-2xx status, from the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The body parsed as JSON but was not an array of records.
    #[error("unexpected response shape from {url}: expected an array, found {found}")]
    UnexpectedShape { url: String, found: &'static str },
}

/// Why a single raw record could not be normalized.
///
/// Every variant carries the record's position in the response and, where it
/// applies, the dotted path of the offending field (e.g. `courts[1].courtId`).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("record {index}: expected an object, found {found}")]
    NotAnObject { index: usize, found: &'static str },

    #[error("record {index}: missing field `{field}`")]
    MissingField { index: usize, field: String },

    #[error("record {index}: field `{field}` is not a valid tagged value: {reason}")]
    Malformed {
        index: usize,
        field: String,
        reason: String,
    },

    #[error("record {index}: field `{field}` expected tag {expected}, found {found}")]
    WrongType {
        index: usize,
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("record {index}: field `{field}` is not a number: {value:?}")]
    InvalidNumber {
        index: usize,
        field: String,
        value: String,
    },

    #[error("record {index}: coordinate out of range (latitude {latitude}, longitude {longitude})")]
    CoordinateOutOfRange {
        index: usize,
        latitude: f64,
        longitude: f64,
    },

    #[error("record {index}: duplicate locationId {location_id:?}")]
    DuplicateLocationId { index: usize, location_id: String },
}

impl NormalizeError {
    /// Position of the failing record in the raw response.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::NotAnObject { index, .. }
            | Self::MissingField { index, .. }
            | Self::Malformed { index, .. }
            | Self::WrongType { index, .. }
            | Self::InvalidNumber { index, .. }
            | Self::CoordinateOutOfRange { index, .. }
            | Self::DuplicateLocationId { index, .. } => *index,
        }
    }
}
