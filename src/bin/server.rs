//! Hyperstat standalone server
//!
//! Runs the snapshot API for this process, with operator commands read from
//! stdin (`status`, `port <n>`, `reload`, `start`, `stop`, `quit`).

use anyhow::Context;
use clap::Parser;
use hyperstat::admin::Console;
use hyperstat::{ApiConfig, ProcessSnapshot, Server, SnapshotProvider, logging};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tracing::{error, info};

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "hyperstat-server", version, about = "Serve live JSON snapshots over HTTP")]
struct Args {
    /// Configuration file path (created with defaults if missing)
    #[arg(short, long, default_value = "hyperstat.toml")]
    config: PathBuf,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the bind address (e.g. 127.0.0.1)
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Output logs in JSON format
    #[arg(long)]
    json_logs: bool,

    /// Player slot limit reported by the standalone provider
    #[arg(long, default_value_t = 20)]
    max_players: u32,

    /// Memory limit in MiB reported as `memory_total`
    #[arg(long, default_value_t = 1024)]
    memory_limit_mb: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ApiConfig::load_or_create(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;

    // CLI overrides apply to this run only; the console never saves them
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(bind) = args.bind {
        config.api.bind_address = bind;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if args.json_logs {
        config.logging.json_format = true;
    }

    logging::init(&config.logging).context("initializing logging")?;

    let provider: Arc<dyn SnapshotProvider> =
        Arc::new(ProcessSnapshot::new("hyperstat", args.max_players, args.memory_limit_mb));

    let mut server = Server::new(&config, Arc::clone(&provider))?;
    let addr = match server.start() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to start HTTP server: {e}");
            return Err(e.into());
        }
    };
    info!("API available at http://{addr}/api/");

    let mut console = Console::new(server, config, &args.config, provider);
    let mut quit = false;

    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        let line = line.trim();

        if matches!(line, "quit" | "exit") {
            quit = true;
            break;
        }
        if line.is_empty() {
            continue;
        }

        match console.execute_line(line) {
            Ok(output) => output.iter().for_each(|l| println!("{l}")),
            Err(e) => println!("{e}"),
        }
    }

    // stdin closed without `quit`: keep serving until killed
    if !quit && console.server().is_running() {
        info!("stdin closed, serving until terminated");
        loop {
            thread::park();
        }
    }

    Ok(())
}
