//! Hyperstat - embedded snapshot API server
//!
//! A small HTTP/1.1 server, built directly on std sockets, that answers a
//! fixed set of `/api/*` endpoints with JSON snapshots of a host
//! application's live state (players, tick rate, memory, worlds).
//!
//! One accept thread hands each connection to a fixed worker pool. A worker
//! reads the request line, routes it, writes one response and closes the
//! connection. Every response is computed fresh from the host's
//! [`SnapshotProvider`].
//!
//! ```no_run
//! use hyperstat::{ProcessSnapshot, ServerBuilder};
//! use std::sync::Arc;
//!
//! let mut server = ServerBuilder::new()
//!     .port(8080)
//!     .build(Arc::new(ProcessSnapshot::new("standalone", 20, 1024)));
//! server.start().unwrap();
//! // ...
//! server.stop().unwrap();
//! ```

#![warn(missing_docs)]

pub mod admin;
pub mod api;
pub mod builder;
pub mod config;
pub mod error;
pub mod http;
pub mod json;
pub mod logging;
pub mod snapshot;

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub use api::{ApiIdentity, NotFoundPolicy};
pub use builder::ServerBuilder;
pub use config::ApiConfig;
pub use error::{ConfigError, ServerError};
pub use http::{Method, Request, Response, Router, ServerSettings, Status};
pub use snapshot::{ProcessSnapshot, ServerMetadata, SnapshotError, SnapshotProvider, WorldInfo};

/// How long `stop` waits to connect to its own listener
const WAKE_TIMEOUT: Duration = Duration::from_secs(1);

/// Pause after a failed accept
const ACCEPT_BACKOFF: Duration = Duration::from_millis(25);

/// The snapshot API server
///
/// Can be started and stopped repeatedly; each `start` binds a fresh
/// listener and worker pool.
pub struct Server {
    settings: ServerSettings,
    router: Arc<Router>,
    running: Option<Running>,
}

struct Running {
    addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    acceptor: JoinHandle<()>,
}

impl Server {
    /// Create a server from configuration
    pub fn new(config: &ApiConfig, provider: Arc<dyn SnapshotProvider>) -> Result<Self, ServerError> {
        Ok(ServerBuilder::new()
            .settings(config.server_settings()?)
            .identity(ApiIdentity::from(config))
            .not_found(NotFoundPolicy::from_strict(config.api.strict_not_found))
            .build(provider))
    }

    /// Create a server around a prepared route table
    pub fn with_router(settings: ServerSettings, router: Router) -> Self {
        Self {
            settings,
            router: Arc::new(router),
            running: None,
        }
    }

    /// Bind the listener and start accepting connections.
    ///
    /// Returns the bound address, which differs from the configured one when
    /// the port is 0.
    pub fn start(&mut self) -> Result<SocketAddr, ServerError> {
        if let Some(running) = &self.running {
            return Err(ServerError::AlreadyRunning(running.addr));
        }

        let bind_addr = self.settings.bind_addr();
        let listener = TcpListener::bind(bind_addr)
            .map_err(|source| ServerError::Bind { addr: bind_addr, source })?;
        let addr = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { addr: bind_addr, source })?;

        let pool = http::ThreadPool::new(self.settings.workers, &self.settings.thread_name)
            .map_err(ServerError::Spawn)?;
        let workers = pool.size();

        let shutdown = Arc::new(AtomicBool::new(false));
        let acceptor = {
            let shutdown = Arc::clone(&shutdown);
            let router = Arc::clone(&self.router);
            let read_timeout = self.settings.read_timeout;
            thread::Builder::new()
                .name(format!("{}-acceptor", self.settings.thread_name))
                .spawn(move || accept_loop(listener, pool, router, shutdown, read_timeout))
                .map_err(ServerError::Spawn)?
        };

        info!(%addr, workers, "snapshot API listening");
        self.running = Some(Running {
            addr,
            shutdown,
            acceptor,
        });
        Ok(addr)
    }

    /// Stop accepting connections and close the listener.
    ///
    /// Connections already accepted are left to finish. No-op when stopped.
    /// If the accept thread cannot be woken the server stays running and
    /// `stop` can be retried.
    pub fn stop(&mut self) -> Result<(), ServerError> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };

        running.shutdown.store(true, Ordering::Release);

        // accept() only returns on a connection, so hand it one
        if !running.acceptor.is_finished() {
            if let Err(source) =
                TcpStream::connect_timeout(&http::wake_addr(running.addr), WAKE_TIMEOUT)
            {
                let addr = running.addr;
                self.running = Some(running);
                return Err(ServerError::Wake { addr, source });
            }
        }

        if running.acceptor.join().is_err() {
            error!("acceptor thread panicked");
        }
        info!(addr = %running.addr, "snapshot API stopped");
        Ok(())
    }

    /// Whether the listener is open
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Bound address while running
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|r| r.addr)
    }

    /// Configured port
    pub fn port(&self) -> u16 {
        self.settings.port
    }

    /// Change the port used by the next `start`
    pub fn set_port(&mut self, port: u16) {
        self.settings.port = port;
    }

    /// Current settings
    pub fn settings(&self) -> &ServerSettings {
        &self.settings
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!(error = %e, "listener left open on drop");
        }
    }
}

fn accept_loop(
    listener: TcpListener,
    pool: http::ThreadPool,
    router: Arc<Router>,
    shutdown: Arc<AtomicBool>,
    read_timeout: Option<Duration>,
) {
    dispatch(listener.incoming(), &pool, &router, &shutdown, read_timeout);
    drop(listener);
    debug!("acceptor stopped");
}

fn dispatch(
    incoming: impl Iterator<Item = io::Result<TcpStream>>,
    pool: &http::ThreadPool,
    router: &Arc<Router>,
    shutdown: &AtomicBool,
    read_timeout: Option<Duration>,
) {
    for stream in incoming {
        // Whatever woke us, a set flag means we are done
        if shutdown.load(Ordering::Acquire) {
            break;
        }

        match stream {
            Ok(stream) => {
                let router = Arc::clone(router);
                let job = move || http::handle_connection(stream, &router, read_timeout);
                if let Err(e) = pool.execute(job) {
                    error!(error = %e, "dropping connection");
                    break;
                }
            }
            Err(e) => {
                // EMFILE and friends persist; don't spin on them
                warn!(error = %e, "error accepting connection");
                thread::sleep(ACCEPT_BACKOFF);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_server() -> Server {
        ServerBuilder::new()
            .settings(ServerSettings::development())
            .build(Arc::new(ProcessSnapshot::new("test", 10, 256)))
    }

    #[test]
    fn test_start_stop_cycle() {
        let mut server = test_server();
        assert!(!server.is_running());
        assert!(server.local_addr().is_none());

        let addr = server.start().unwrap();
        assert!(server.is_running());
        assert_eq!(server.local_addr(), Some(addr));
        assert_ne!(addr.port(), 0);

        server.stop().unwrap();
        assert!(!server.is_running());
        server.stop().unwrap();

        // Restart binds a fresh listener
        server.start().unwrap();
        assert!(server.is_running());
    }

    #[test]
    fn test_double_start_rejected() {
        let mut server = test_server();
        let addr = server.start().unwrap();
        assert!(matches!(server.start(), Err(ServerError::AlreadyRunning(a)) if a == addr));
    }

    #[test]
    fn test_port_in_use_is_a_bind_error() {
        let mut first = test_server();
        let addr = first.start().unwrap();

        let mut second = test_server();
        second.set_port(addr.port());
        assert_eq!(second.port(), addr.port());

        let err = second.start().unwrap_err();
        assert!(matches!(err, ServerError::Bind { .. }));
        assert!(!second.is_running());
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let mut config = ApiConfig::default();
        config.api.bind_address = "nowhere".to_string();

        let provider = Arc::new(ProcessSnapshot::new("test", 10, 256));
        assert!(matches!(Server::new(&config, provider), Err(ServerError::Config(_))));
    }

    #[test]
    fn test_failed_wake_leaves_server_running() {
        // A port nothing listens on, standing in for an unreachable listener
        let closed = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();

        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        let mut server = test_server();
        server.running = Some(Running {
            addr: closed,
            shutdown: Arc::new(AtomicBool::new(false)),
            acceptor: thread::spawn(move || {
                let _ = release_rx.recv();
            }),
        });

        let err = server.stop().unwrap_err();
        assert!(matches!(err, ServerError::Wake { addr, .. } if addr == closed));
        assert!(server.is_running());
        assert!(matches!(server.start(), Err(ServerError::AlreadyRunning(_))));

        // Once the acceptor has exited, a retry completes without waking it
        release_tx.send(()).unwrap();
        while !server.running.as_ref().unwrap().acceptor.is_finished() {
            thread::sleep(Duration::from_millis(5));
        }
        server.stop().unwrap();
        assert!(!server.is_running());
    }

    #[test]
    fn test_accept_errors_back_off() {
        let pool = http::ThreadPool::new(1, "test").unwrap();
        let router = Arc::new(Router::new(|_| Response::json("{}")));
        let shutdown = AtomicBool::new(false);
        let failures = (0..4).map(|_| Err::<TcpStream, _>(io::Error::other("too many open files")));

        let before = std::time::Instant::now();
        dispatch(failures, &pool, &router, &shutdown, None);
        assert!(before.elapsed() >= ACCEPT_BACKOFF * 4);
    }
}
