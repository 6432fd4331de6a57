//! Snapshot provider boundary
//!
//! The host application answers these queries; the server never caches the
//! results, so every request sees current values. Implementations must be
//! safe to call from several worker threads at once.

use std::time::Instant;
use thiserror::Error;

/// Nominal full tick rate, also used when the host cannot report TPS
pub const NOMINAL_TPS: f64 = 20.0;

/// Failure reading an optional host metric
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The host does not expose this metric
    #[error("{0} is not available")]
    Unavailable(&'static str),
    /// The host exposes the metric but reading it failed
    #[error("metric query failed: {0}")]
    Failed(String),
}

/// One loaded world as reported by the host
#[derive(Debug, Clone, PartialEq)]
pub struct WorldInfo {
    /// World name
    pub name: String,
    /// Environment kind (e.g. `NORMAL`, `NETHER`)
    pub environment: String,
    /// Players currently in this world
    pub players: u32,
    /// Loaded chunk count
    pub loaded_chunks: u32,
    /// Entity count
    pub entities: u32,
}

/// Static-ish facts about the host server
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerMetadata {
    /// Server implementation name
    pub name: String,
    /// Server version string
    pub version: String,
    /// Message of the day
    pub motd: Option<String>,
    /// Version of the host's plugin API
    pub api_version: Option<String>,
    /// Version of the runtime the host runs on
    pub runtime_version: Option<String>,
    /// Operating system name
    pub operating_system: Option<String>,
    /// Available CPU cores
    pub cpu_cores: Option<u32>,
    /// Configured view distance
    pub view_distance: Option<u32>,
    /// Configured simulation distance
    pub simulation_distance: Option<u32>,
    /// Number of installed plugins
    pub plugins_count: Option<u32>,
}

/// Point-in-time queries into the host application
pub trait SnapshotProvider: Send + Sync {
    /// Names of online players, in host order
    fn online_player_names(&self) -> Vec<String>;

    /// Player slot limit
    fn max_players(&self) -> u32;

    /// Recent ticks per second. May fail when the host hides the counter.
    fn tps(&self) -> Result<f64, SnapshotError>;

    /// Heap in use, in MiB
    fn heap_used_mb(&self) -> u64;

    /// Heap limit, in MiB
    fn heap_max_mb(&self) -> u64;

    /// Seconds since the host came up
    fn uptime_seconds(&self) -> u64;

    /// Loaded worlds
    fn worlds(&self) -> Vec<WorldInfo>;

    /// Server identity and settings
    fn server_metadata(&self) -> ServerMetadata;
}

/// TPS as served to clients: failures and garbage collapse to the nominal rate.
pub fn effective_tps(provider: &dyn SnapshotProvider) -> f64 {
    match provider.tps() {
        Ok(tps) if tps.is_finite() => tps.clamp(0.0, NOMINAL_TPS),
        Ok(tps) => {
            tracing::debug!(tps, "non-finite TPS reported, using nominal rate");
            NOMINAL_TPS
        }
        Err(e) => {
            tracing::debug!(error = %e, "TPS unavailable, using nominal rate");
            NOMINAL_TPS
        }
    }
}

/// Provider describing the current process, for running without a host
pub struct ProcessSnapshot {
    started: Instant,
    metadata: ServerMetadata,
    max_players: u32,
    heap_max_mb: u64,
    worlds: Vec<WorldInfo>,
}

impl ProcessSnapshot {
    /// Create a provider; uptime counts from now
    pub fn new(name: &str, max_players: u32, heap_max_mb: u64) -> Self {
        let cpu_cores = std::thread::available_parallelism()
            .ok()
            .and_then(|n| u32::try_from(n.get()).ok());

        Self {
            started: Instant::now(),
            metadata: ServerMetadata {
                name: name.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                operating_system: Some(std::env::consts::OS.to_string()),
                cpu_cores,
                ..ServerMetadata::default()
            },
            max_players,
            heap_max_mb,
            worlds: Vec::new(),
        }
    }

    /// Report these worlds
    pub fn with_worlds(mut self, worlds: Vec<WorldInfo>) -> Self {
        self.worlds = worlds;
        self
    }

    /// Set the message of the day
    pub fn with_motd(mut self, motd: impl Into<String>) -> Self {
        self.metadata.motd = Some(motd.into());
        self
    }
}

impl SnapshotProvider for ProcessSnapshot {
    fn online_player_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn max_players(&self) -> u32 {
        self.max_players
    }

    fn tps(&self) -> Result<f64, SnapshotError> {
        Err(SnapshotError::Unavailable("tick rate"))
    }

    fn heap_used_mb(&self) -> u64 {
        memory_stats::memory_stats()
            .map(|usage| (usage.physical_mem / (1024 * 1024)) as u64)
            .unwrap_or(0)
    }

    fn heap_max_mb(&self) -> u64 {
        self.heap_max_mb
    }

    fn uptime_seconds(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    fn worlds(&self) -> Vec<WorldInfo> {
        self.worlds.clone()
    }

    fn server_metadata(&self) -> ServerMetadata {
        self.metadata.clone()
    }
}
