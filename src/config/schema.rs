//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Base URL of the upstream LLM server.
    pub upstream_url: String,

    /// Listener bind host.
    pub host: String,

    /// Listener bind port.
    pub port: u16,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            upstream_url: "http://localhost:8000".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ProxyConfig {
    /// Address the listener binds to, in `host:port` form.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
