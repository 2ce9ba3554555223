//! HTTP server configuration settings.

use std::net::{Ipv4Addr, SocketAddr};

use serde::Deserialize;

/// HTTP server configuration settings.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// The socket address the server should listen on. When unset, the
    /// loader falls back to `0.0.0.0` with the `PORT` environment variable
    /// (default 8000).
    pub listen_address: Option<SocketAddr>,
    /// Liveness endpoint configuration.
    pub health: HealthConfig,
}

impl ServerConfig {
    /// The address to bind, with the documented default applied.
    pub fn listen_address_or_default(&self) -> SocketAddr {
        self.listen_address
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8000)))
    }
}

/// Liveness endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HealthConfig {
    /// Whether the liveness endpoint is exposed.
    pub enabled: bool,
    /// Path of the liveness endpoint.
    pub path: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/healthz".to_string(),
        }
    }
}
