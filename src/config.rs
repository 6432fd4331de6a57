//! Configuration loaded from a TOML file
//!
//! Every field has a serde default, so a partial file (or none at all) is a
//! valid configuration. A missing file is created with the defaults.

use crate::error::ConfigError;
use crate::http::{DEFAULT_PORT, DEFAULT_WORKERS, ServerSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;
use tracing::info;

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_source() -> String {
    "hyperstat".to_string()
}

fn default_plugin_name() -> String {
    "Hyperstat API v1.0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Listener settings
    #[serde(default)]
    pub api: ApiSettings,
    /// Strings identifying this API in responses
    #[serde(default)]
    pub identity: IdentitySettings,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Listener and pool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// TCP port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Interface to bind
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Read timeout per connection in milliseconds; unset waits forever
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_timeout_ms: Option<u64>,
    /// Answer unknown paths with a real 404 instead of 200
    #[serde(default)]
    pub strict_not_found: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            workers: default_workers(),
            read_timeout_ms: None,
            strict_not_found: false,
        }
    }
}

/// Identity strings echoed in response bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentitySettings {
    /// Value of the `source` field
    #[serde(default = "default_source")]
    pub source: String,
    /// Value of `plugin` in health and `message` in the directory
    #[serde(default = "default_plugin_name")]
    pub plugin_name: String,
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            source: default_source(),
            plugin_name: default_plugin_name(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl ApiConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        Self::from_toml(path, &content)
    }

    /// Load configuration, writing the defaults first if the file is missing
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::load(path);
        }

        let config = Self::default();
        config.save(path)?;
        info!("Created default configuration file: {}", path.display());
        Ok(config)
    }

    /// Persist configuration to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| ConfigError::Write(path.to_path_buf(), e))
    }

    /// Resolve listener settings
    pub fn server_settings(&self) -> Result<ServerSettings, ConfigError> {
        let bind_ip: IpAddr = self
            .api
            .bind_address
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                field: "api.bind_address",
                reason: e.to_string(),
            })?;

        if self.api.workers == 0 {
            return Err(ConfigError::Invalid {
                field: "api.workers",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(ServerSettings {
            bind_ip,
            port: self.api.port,
            workers: self.api.workers,
            read_timeout: self
                .api
                .read_timeout_ms
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis),
            ..ServerSettings::default()
        })
    }
}
