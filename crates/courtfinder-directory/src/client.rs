//! HTTP client for the court directory endpoint.
//!
//! The endpoint takes no parameters and returns every known location in one
//! JSON array of tagged-scalar records.

use std::time::Duration;

use reqwest::Client;

use crate::attribute::json_kind;
use crate::error::DirectoryError;
use crate::normalize::{normalize_directory, DirectoryLoad};

/// Client for the court directory endpoint.
pub struct DirectoryClient {
    client: Client,
    url: String,
}

impl DirectoryClient {
    /// Creates a client for the directory at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            url: url.to_owned(),
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetches the raw records without normalizing them.
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::Http`] on network failure or a non-2xx status.
    /// - [`DirectoryError::Deserialize`] if the body is not valid JSON.
    /// - [`DirectoryError::UnexpectedShape`] if the body is not a JSON array.
    pub async fn fetch_raw(&self) -> Result<Vec<serde_json::Value>, DirectoryError> {
        let response = self.client.get(&self.url).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        let payload: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| DirectoryError::Deserialize {
                context: self.url.clone(),
                source: e,
            })?;

        match payload {
            serde_json::Value::Array(records) => Ok(records),
            other => Err(DirectoryError::UnexpectedShape {
                url: self.url.clone(),
                found: json_kind(&other),
            }),
        }
    }

    /// Fetches and normalizes the directory. Malformed records are skipped
    /// and listed in [`DirectoryLoad::rejected`].
    ///
    /// # Errors
    ///
    /// See [`DirectoryClient::fetch_raw`].
    pub async fn load(&self) -> Result<DirectoryLoad, DirectoryError> {
        let records = self.fetch_raw().await?;
        let load = normalize_directory(&records);
        tracing::info!(
            url = %self.url,
            records = records.len(),
            loaded = load.locations.len(),
            rejected = load.rejected.len(),
            "court directory loaded"
        );
        Ok(load)
    }
}
