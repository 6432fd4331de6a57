//! Error types for server lifecycle and configuration

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Errors starting or controlling the server
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be bound (port in use, no permission)
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address we tried to bind
        addr: SocketAddr,
        /// Underlying socket error
        source: io::Error,
    },

    /// `start` called on a server that is already listening
    #[error("server is already running on {0}")]
    AlreadyRunning(SocketAddr),

    /// `stop` could not reach its own listener to unblock the accept thread;
    /// the server is still running
    #[error("failed to wake listener on {addr}: {source}")]
    Wake {
        /// Listener address
        addr: SocketAddr,
        /// Underlying socket error
        source: io::Error,
    },

    /// A worker or the accept thread could not be spawned
    #[error("failed to spawn thread: {0}")]
    Spawn(#[source] io::Error),

    /// Configuration could not be turned into server settings
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the config file failed
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, #[source] io::Error),

    /// Writing the config file failed
    #[error("failed to write {0}: {1}")]
    Write(PathBuf, #[source] io::Error),

    /// The file is not valid TOML for this schema
    #[error("failed to parse {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),

    /// The config could not be serialized
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A field holds an unusable value
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Dotted field name
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}
