//! Endpoint bodies
//!
//! Each handler queries the provider for exactly the fields it renders and
//! returns the JSON document. None of them can fail: a missing metric gets a
//! default instead.

use super::ApiIdentity;
use crate::json::{Value, object};
use crate::snapshot::{SnapshotProvider, effective_tps};
use std::time::{SystemTime, UNIX_EPOCH};

/// Paths listed by the directory endpoint, relative to `/api`
pub const ENDPOINTS: [&str; 6] = [
    "/status",
    "/players",
    "/performance",
    "/world",
    "/server-info",
    "/health",
];

/// Milliseconds per tick when the rate is unknown or zero
const IDLE_MSPT: f64 = 50.0;

/// Milliseconds since the UNIX epoch, as a JSON string
fn timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
        .to_string()
}

fn count(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

/// `GET /api/`
pub fn directory(identity: &ApiIdentity) -> Value {
    object()
        .string("message", &identity.plugin_name)
        .strings("endpoints", ENDPOINTS)
        .build()
}

/// `GET /api/status`
pub fn status(provider: &dyn SnapshotProvider, identity: &ApiIdentity) -> Value {
    let metadata = provider.server_metadata();
    let players = object()
        .uint("online", count(provider.online_player_names().len()))
        .uint("max", provider.max_players().into())
        .build();

    object()
        .bool("online", true)
        .object("players", players)
        .string("version", &metadata.version)
        .string("server_type", &metadata.name)
        .uint("uptime", provider.uptime_seconds())
        .opt_string("motd", metadata.motd.as_deref())
        .string("source", &identity.source)
        .string("timestamp", &timestamp())
        .build()
}

/// `GET /api/players`
pub fn players(provider: &dyn SnapshotProvider) -> Value {
    let names = provider.online_player_names();

    object()
        .uint("online", count(names.len()))
        .uint("max", provider.max_players().into())
        .strings("players", &names)
        .build()
}

/// `GET /api/performance`
pub fn performance(provider: &dyn SnapshotProvider, identity: &ApiIdentity) -> Value {
    let tps = effective_tps(provider);
    let mspt = if tps > 0.0 { 1000.0 / tps } else { IDLE_MSPT };

    let used = provider.heap_used_mb();
    let total = provider.heap_max_mb();
    let percent = if total > 0 {
        used as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    object()
        .fixed("tps", tps, 1)
        .fixed("mspt", mspt, 1)
        .uint("memory_used", used)
        .uint("memory_total", total)
        .fixed("memory_percent", percent, 1)
        .string("source", &identity.source)
        .string("timestamp", &timestamp())
        .build()
}

/// `GET /api/world`
pub fn world(provider: &dyn SnapshotProvider) -> Value {
    let worlds = provider
        .worlds()
        .iter()
        .map(|w| {
            object()
                .string("name", &w.name)
                .string("environment", &w.environment)
                .uint("players", w.players.into())
                .uint("loaded_chunks", w.loaded_chunks.into())
                .uint("entities", w.entities.into())
                .build()
        })
        .collect();

    object().array("worlds", worlds).build()
}

/// `GET /api/server-info`
pub fn server_info(provider: &dyn SnapshotProvider) -> Value {
    let metadata = provider.server_metadata();

    object()
        .string("server_name", &metadata.name)
        .string("version", &metadata.version)
        .opt_string("bukkit_version", metadata.api_version.as_deref())
        .opt_string("java_version", metadata.runtime_version.as_deref())
        .opt_string("operating_system", metadata.operating_system.as_deref())
        .opt_uint("cpu_cores", metadata.cpu_cores.map(u64::from))
        .uint("max_players", provider.max_players().into())
        .opt_uint("view_distance", metadata.view_distance.map(u64::from))
        .opt_uint("simulation_distance", metadata.simulation_distance.map(u64::from))
        .opt_uint("plugins_count", metadata.plugins_count.map(u64::from))
        .uint("worlds_count", count(provider.worlds().len()))
        .build()
}

/// `GET /api/health`
pub fn health(provider: &dyn SnapshotProvider, identity: &ApiIdentity) -> Value {
    object()
        .string("status", "OK")
        .string("plugin", &identity.plugin_name)
        .string("timestamp", &timestamp())
        .uint("uptime_seconds", provider.uptime_seconds())
        .build()
}

/// Body for unmatched paths
pub fn not_found() -> Value {
    object().string("error", "Not found").build()
}

