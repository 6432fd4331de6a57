//! Server builder

use crate::api::{self, ApiIdentity, NotFoundPolicy};
use crate::http::{Router, ServerSettings};
use crate::snapshot::SnapshotProvider;
use crate::Server;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

/// Server builder
pub struct ServerBuilder {
    settings: ServerSettings,
    identity: ApiIdentity,
    not_found: NotFoundPolicy,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    /// Create new server builder with default settings
    pub fn new() -> Self {
        Self {
            settings: ServerSettings::default(),
            identity: ApiIdentity::default(),
            not_found: NotFoundPolicy::default(),
        }
    }

    /// Start from resolved settings
    pub fn settings(mut self, settings: ServerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Interface to bind
    pub fn bind_ip(mut self, ip: IpAddr) -> Self {
        self.settings.bind_ip = ip;
        self
    }

    /// Port to bind; 0 picks a free one
    pub fn port(mut self, port: u16) -> Self {
        self.settings.port = port;
        self
    }

    /// Worker thread count
    pub fn workers(mut self, workers: usize) -> Self {
        self.settings.workers = workers;
        self
    }

    /// Per-connection read timeout
    pub fn read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.settings.read_timeout = timeout;
        self
    }

    /// Strings echoed in response bodies
    pub fn identity(mut self, identity: ApiIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Status used for unknown paths
    pub fn not_found(mut self, policy: NotFoundPolicy) -> Self {
        self.not_found = policy;
        self
    }

    /// Build a server exposing the snapshot API over `provider`
    pub fn build(self, provider: Arc<dyn SnapshotProvider>) -> Server {
        let router = api::routes(provider, self.identity, self.not_found);
        Server::with_router(self.settings, router)
    }

    /// Build a server with a custom route table
    pub fn build_with_router(self, router: Router) -> Server {
        Server::with_router(self.settings, router)
    }
}
