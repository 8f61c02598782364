//! Configuration loading from the environment.

use axum::http::Uri;

use crate::config::schema::ProxyConfig;

/// Environment variable naming the upstream base URL.
pub const UPSTREAM_URL_VAR: &str = "LLM_SERVER_URL";
/// Environment variable naming the listener port.
pub const PORT_VAR: &str = "PORT";
/// Environment variable naming the listener host.
pub const HOST_VAR: &str = "HOST";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// `PORT` was set but is not a valid TCP port number.
    InvalidPort(String),
    /// `LLM_SERVER_URL` is not an absolute http(s) URL.
    InvalidUpstreamUrl(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidPort(value) => write!(f, "Invalid {}: {}", PORT_VAR, value),
            ConfigError::InvalidUpstreamUrl(value) => {
                write!(f, "Invalid {}: {}", UPSTREAM_URL_VAR, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load the proxy configuration from the environment, falling back to the
/// documented defaults for any variable that is unset.
pub fn load_from_env() -> Result<ProxyConfig, ConfigError> {
    let defaults = ProxyConfig::default();

    let upstream_url = std::env::var(UPSTREAM_URL_VAR).unwrap_or(defaults.upstream_url);
    validate_upstream_url(&upstream_url)?;

    let port = match std::env::var(PORT_VAR) {
        Ok(value) => value
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(value))?,
        Err(_) => defaults.port,
    };

    let host = std::env::var(HOST_VAR).unwrap_or(defaults.host);

    Ok(ProxyConfig {
        upstream_url,
        host,
        port,
    })
}

/// The upstream URL must be absolute: forwarded targets are formed by
/// appending the request path to it verbatim, so a missing scheme would
/// fail on every single request instead of once at startup.
fn validate_upstream_url(url: &str) -> Result<(), ConfigError> {
    let uri = url
        .parse::<Uri>()
        .map_err(|_| ConfigError::InvalidUpstreamUrl(url.to_string()))?;
    if uri.scheme().is_none() || uri.authority().is_none() {
        return Err(ConfigError::InvalidUpstreamUrl(url.to_string()));
    }
    Ok(())
}
