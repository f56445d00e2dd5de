use std::net::SocketAddr;

use thiserror::Error;

use crate::app_config::{AppConfig, Environment};

pub const DEFAULT_DIRECTORY_URL: &str =
    "https://a4wihgjg24.execute-api.us-west-1.amazonaws.com/courts";
pub const DEFAULT_GEOCODE_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it from a
/// `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values count as unset so `KEY=` in a .env file does not enable a feature.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Ok(raw)
        } else {
            Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected an http(s) URL, got '{raw}'"),
            })
        }
    };

    let env = parse_environment(&or_default("COURTFINDER_ENV", "development"))?;
    let bind_addr = parse_addr("COURTFINDER_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("COURTFINDER_LOG_LEVEL", "info");
    let directory_url = parse_url("COURTFINDER_DIRECTORY_URL", DEFAULT_DIRECTORY_URL)?;
    let geocode_base_url = parse_url("COURTFINDER_GEOCODE_BASE_URL", DEFAULT_GEOCODE_BASE_URL)?;
    let maps_api_key = optional("GOOGLE_MAPS_API_KEY");
    let public_maps_api_key = optional("COURTFINDER_PUBLIC_MAPS_API_KEY");
    let request_timeout_secs = parse_u64("COURTFINDER_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("COURTFINDER_USER_AGENT", "courtfinder/0.1 (court-search)");
    let geocode_rate_limit_per_minute =
        parse_usize("COURTFINDER_GEOCODE_RATE_LIMIT_PER_MINUTE", "60")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        directory_url,
        geocode_base_url,
        maps_api_key,
        public_maps_api_key,
        request_timeout_secs,
        user_agent,
        geocode_rate_limit_per_minute,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "COURTFINDER_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
