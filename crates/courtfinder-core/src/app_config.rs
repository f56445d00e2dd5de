use std::net::SocketAddr;

use crate::config::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub directory_url: String,
    pub geocode_base_url: String,
    /// Server-side key, used only by the geocoding proxy.
    pub maps_api_key: Option<String>,
    /// Key for clients calling the geocoding service directly.
    pub public_maps_api_key: Option<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Requests per minute accepted by the geocoding proxy.
    pub geocode_rate_limit_per_minute: usize,
}

impl AppConfig {
    /// Returns the client-side geocoding key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when it is not configured.
    pub fn public_maps_api_key(&self) -> Result<&str, ConfigError> {
        self.public_maps_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("COURTFINDER_PUBLIC_MAPS_API_KEY".into()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("directory_url", &self.directory_url)
            .field("geocode_base_url", &self.geocode_base_url)
            .field(
                "maps_api_key",
                &self.maps_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "public_maps_api_key",
                &self.public_maps_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field(
                "geocode_rate_limit_per_minute",
                &self.geocode_rate_limit_per_minute,
            )
            .finish()
    }
}
