pub mod attribute;
pub mod client;
pub mod error;
pub mod normalize;

pub use attribute::AttributeValue;
pub use client::DirectoryClient;
pub use error::{DirectoryError, NormalizeError};
pub use normalize::{normalize_directory, normalize_location, DirectoryLoad};
