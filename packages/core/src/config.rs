//! Runtime configuration for the dev server
//!
//! Derived from the environment at startup and immutable for the
//! process lifetime. Not serialized; rebuilt on every launch.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Default dev server port, overridable via `DEV_SERVER_PORT`.
pub const DEFAULT_PORT: u16 = 3400;

/// Dev server configuration.
#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    /// Port the HTTP dev API binds to
    pub port: u16,
}

impl ServerConfig {
    /// Build configuration from the environment.
    ///
    /// - `DEV_SERVER_PORT`: server port (default 3400); unparseable
    ///   values fall back to the default rather than failing startup
    pub fn from_env() -> Self {
        let port = std::env::var("DEV_SERVER_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        Self { port }
    }

    /// Loopback-only bind address. The dev API is unauthenticated and
    /// must not listen on external interfaces.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_addr_is_loopback() {
        let config = ServerConfig::default();
        assert!(config.bind_addr().ip().is_loopback());
        assert_eq!(config.bind_addr().port(), DEFAULT_PORT);
    }
}
