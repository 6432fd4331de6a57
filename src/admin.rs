//! Operator command surface
//!
//! The host forwards admin commands (`status`, `port [n]`, `reload`, `start`,
//! `stop`, `help`) here. Each command returns the lines to show the operator.
//! A port change is saved to the config file and applies on the next start.
//! A reload rebuilds the server from the file; while it is running the new
//! settings wait for the next start.

use crate::config::ApiConfig;
use crate::error::{ConfigError, ServerError};
use crate::snapshot::SnapshotProvider;
use crate::Server;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

const USAGE: &str = "Commands: status | port [n] | reload | start | stop | help";

/// Admin command errors
#[derive(Debug, Error)]
pub enum AdminError {
    /// Unrecognized command word
    #[error("unknown command '{0}', try 'help'")]
    UnknownCommand(String),
    /// Port argument is not a valid port number
    #[error("invalid port number '{0}'")]
    InvalidPort(String),
    /// Config file could not be read or written
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Server could not be started or stopped
    #[error(transparent)]
    Server(#[from] ServerError),
}

/// A parsed admin command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    /// Show running state, port and player counts
    Status,
    /// Show the port, or set it for the next start
    Port(Option<u16>),
    /// Re-read the config file
    Reload,
    /// Start the server
    Start,
    /// Stop the server
    Stop,
    /// Show usage
    Help,
}

impl FromStr for AdminCommand {
    type Err = AdminError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(Self::Help);
        };

        match command.to_ascii_lowercase().as_str() {
            "status" => Ok(Self::Status),
            "port" => match words.next() {
                None => Ok(Self::Port(None)),
                Some(arg) => arg
                    .parse::<u16>()
                    .ok()
                    .filter(|port| *port != 0)
                    .map(|port| Self::Port(Some(port)))
                    .ok_or_else(|| AdminError::InvalidPort(arg.to_string())),
            },
            "reload" => Ok(Self::Reload),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "help" => Ok(Self::Help),
            other => Err(AdminError::UnknownCommand(other.to_string())),
        }
    }
}

/// Executes admin commands against a server and its config file
pub struct Console {
    server: Server,
    // Built by `reload` while running; swapped in on the next `start`
    pending: Option<Server>,
    config: ApiConfig,
    config_path: PathBuf,
    provider: Arc<dyn SnapshotProvider>,
}

impl Console {
    /// Wrap a server built from `config`.
    ///
    /// `config` may carry overrides that are not in `config_path`; commands
    /// that persist re-read the file and change only their own field.
    pub fn new(
        server: Server,
        config: ApiConfig,
        config_path: impl Into<PathBuf>,
        provider: Arc<dyn SnapshotProvider>,
    ) -> Self {
        Self {
            server,
            pending: None,
            config,
            config_path: config_path.into(),
            provider,
        }
    }

    /// The managed server
    pub fn server(&self) -> &Server {
        &self.server
    }

    /// Current configuration
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Run one command
    pub fn execute(&mut self, command: AdminCommand) -> Result<Vec<String>, AdminError> {
        match command {
            AdminCommand::Status => Ok(self.status_lines()),
            AdminCommand::Port(None) => Ok(vec![format!("Current port: {}", self.config.api.port)]),
            AdminCommand::Port(Some(port)) => {
                let mut saved = ApiConfig::load(&self.config_path)?;
                saved.api.port = port;
                saved.save(&self.config_path)?;

                self.config.api.port = port;
                self.server.set_port(port);
                if let Some(next) = &mut self.pending {
                    next.set_port(port);
                }
                info!(port, "port changed, applies on next start");
                Ok(vec![format!("Port changed to {port}. Restart the server to apply.")])
            }
            AdminCommand::Reload => {
                let config = ApiConfig::load(&self.config_path)?;
                let next = Server::new(&config, Arc::clone(&self.provider))?;
                self.config = config;

                if self.server.is_running() {
                    self.pending = Some(next);
                    Ok(vec!["Configuration reloaded. Changes apply on the next start.".to_string()])
                } else {
                    self.server = next;
                    self.pending = None;
                    Ok(vec!["Configuration reloaded.".to_string()])
                }
            }
            AdminCommand::Start => {
                if !self.server.is_running() {
                    if let Some(next) = self.pending.take() {
                        self.server = next;
                    }
                }
                let addr = self.server.start()?;
                Ok(vec![format!("HTTP server started on {addr}")])
            }
            AdminCommand::Stop => {
                self.server.stop()?;
                Ok(vec!["HTTP server stopped.".to_string()])
            }
            AdminCommand::Help => Ok(vec![USAGE.to_string()]),
        }
    }

    /// Parse and run one command line
    pub fn execute_line(&mut self, line: &str) -> Result<Vec<String>, AdminError> {
        let command = line.parse()?;
        self.execute(command)
    }

    fn status_lines(&self) -> Vec<String> {
        let state = if self.server.is_running() { "running" } else { "stopped" };
        let port = self
            .server
            .local_addr()
            .map_or(self.server.port(), |addr| addr.port());

        vec![
            format!("HTTP server: {state}"),
            format!("Port: {port}"),
            format!("Players online: {}", self.provider.online_player_names().len()),
            format!("Max players: {}", self.provider.max_players()),
            format!("URL: http://localhost:{port}/api/"),
        ]
    }
}
