//! HTTP client for address geocoding.
//!
//! Two deployments share one client: direct calls to the geocoding service
//! with a client-side API key, and calls through the server's `/api/geocode`
//! proxy, which holds its own key and returns the upstream body verbatim.
//! Both answer with the same envelope, so parsing is shared.

use std::time::Duration;

use courtfinder_core::Coordinate;
use reqwest::{Client, Url};

use crate::error::GeocodeError;
use crate::types::GeocodeResponse;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Client for a geocoding endpoint taking `address` (and optionally `key`)
/// query parameters.
pub struct GeocodeClient {
    client: Client,
    api_key: Option<String>,
    base_url: Url,
}

impl GeocodeClient {
    /// Creates a client that calls the geocoding service directly.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, GeocodeError> {
        Self::with_base_url(Some(api_key), DEFAULT_BASE_URL, timeout_secs, user_agent)
    }

    /// Creates a client that goes through the server-side proxy at
    /// `proxy_url` (e.g. `http://localhost:3000/api/geocode`). No key is sent.
    ///
    /// # Errors
    ///
    /// See [`GeocodeClient::with_base_url`].
    pub fn via_proxy(
        proxy_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, GeocodeError> {
        Self::with_base_url(None, proxy_url, timeout_secs, user_agent)
    }

    /// Creates a client against an arbitrary endpoint (alternate upstreams,
    /// wiremock in tests).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`GeocodeError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(
        api_key: Option<&str>,
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let base_url = Url::parse(base_url).map_err(|e| GeocodeError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.map(str::to_owned),
            base_url,
        })
    }

    /// Resolves `address` to the first matching coordinate.
    ///
    /// Returns `Ok(None)` when the service finds no match.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::EmptyAddress`] if `address` is blank.
    /// - [`GeocodeError::ApiError`] if the service reports an error status.
    /// - [`GeocodeError::Http`] on network failure.
    /// - [`GeocodeError::UpstreamStatus`] on a non-2xx status without a JSON body.
    /// - [`GeocodeError::Deserialize`] if the body does not match the envelope.
    /// - [`GeocodeError::InvalidCoordinate`] if the match is out of range.
    pub async fn geocode(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let body = self.lookup_raw(address).await?;
        let address = address.trim();

        let envelope: GeocodeResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: format!("geocode(address={address})"),
                source: e,
            })?;

        Self::check_api_error(&envelope)?;

        let Some(first) = envelope.results.first() else {
            tracing::info!(address, "geocoder found no match");
            return Ok(None);
        };

        let location = first.geometry.location;
        let coordinate = Coordinate::new(location.lat, location.lng).map_err(|_| {
            GeocodeError::InvalidCoordinate {
                lat: location.lat,
                lng: location.lng,
            }
        })?;

        tracing::debug!(
            address,
            matches = envelope.results.len(),
            formatted_address = first.formatted_address.as_deref().unwrap_or_default(),
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            "address geocoded"
        );
        Ok(Some(coordinate))
    }

    /// Sends the request and returns the body text exactly as received,
    /// once it is known to be JSON.
    ///
    /// A non-2xx response that still carries a JSON body (the service's own
    /// error envelope) is returned like any other, so callers see the
    /// service's `status` and `error_message`.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::EmptyAddress`] if `address` is blank.
    /// - [`GeocodeError::Http`] on network failure.
    /// - [`GeocodeError::UpstreamStatus`] on a non-2xx status whose body is not JSON.
    /// - [`GeocodeError::Deserialize`] if a 2xx body is not valid JSON.
    pub async fn lookup_raw(&self, address: &str) -> Result<String, GeocodeError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }

        let url = self.build_url(address);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<serde::de::IgnoredAny>(&body) {
            Ok(_) => {
                if !status.is_success() {
                    tracing::warn!(
                        address,
                        status = status.as_u16(),
                        "geocoder answered with an error status"
                    );
                }
                Ok(body)
            }
            Err(_) if !status.is_success() => Err(GeocodeError::UpstreamStatus(status.as_u16())),
            Err(e) => Err(GeocodeError::Deserialize {
                context: format!("geocode(address={address})"),
                source: e,
            }),
        }
    }

    /// Builds the request URL with percent-encoded `address` and, for direct
    /// calls, `key` parameters.
    fn build_url(&self, address: &str) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("address", address);
            if let Some(key) = &self.api_key {
                pairs.append_pair("key", key);
            }
        }
        url
    }

    fn check_api_error(envelope: &GeocodeResponse) -> Result<(), GeocodeError> {
        match envelope.status.as_deref() {
            None | Some("OK" | "ZERO_RESULTS") => Ok(()),
            Some(status) => {
                let msg = envelope
                    .error_message
                    .as_deref()
                    .map_or_else(|| status.to_string(), |m| format!("{status}: {m}"));
                Err(GeocodeError::ApiError(msg))
            }
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
