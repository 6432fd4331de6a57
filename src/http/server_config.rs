//! Runtime settings for the listener and worker pool

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Default listening port
pub const DEFAULT_PORT: u16 = 8080;

/// Default worker count
pub const DEFAULT_WORKERS: usize = 4;

/// Listener and pool settings, resolved from configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    /// Interface to bind
    pub bind_ip: IpAddr,
    /// Port to bind; 0 picks a free port
    pub port: u16,
    /// Worker threads handling connections
    pub workers: usize,
    /// Per-connection read timeout. `None` waits indefinitely.
    pub read_timeout: Option<Duration>,
    /// Prefix for worker thread names
    pub thread_name: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            workers: DEFAULT_WORKERS,
            read_timeout: None,
            thread_name: "hyperstat".to_string(),
        }
    }
}

impl ServerSettings {
    /// Settings for tests and local development: loopback, ephemeral port
    pub fn development() -> Self {
        Self {
            bind_ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            ..Self::default()
        }
    }

    /// Address to bind
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }
}

/// Address a local client can connect to in order to reach `bound`
pub(crate) fn wake_addr(bound: SocketAddr) -> SocketAddr {
    let ip = match bound.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(std::net::Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    SocketAddr::new(ip, bound.port())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ServerSettings::default();
        assert_eq!(settings.bind_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(settings.workers, 4);
        assert!(settings.read_timeout.is_none());
    }

    #[test]
    fn test_wake_addr_replaces_unspecified() {
        let bound: SocketAddr = "0.0.0.0:9000".parse().unwrap();
        assert_eq!(wake_addr(bound).to_string(), "127.0.0.1:9000");

        let bound: SocketAddr = "[::]:9000".parse().unwrap();
        assert_eq!(wake_addr(bound).to_string(), "[::1]:9000");

        let bound: SocketAddr = "192.0.2.7:9000".parse().unwrap();
        assert_eq!(wake_addr(bound), bound);
    }
}
