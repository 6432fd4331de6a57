//! Shared helpers for socket-level tests

#![allow(dead_code)]

use hyperstat::{
    ApiIdentity, NotFoundPolicy, Server, ServerBuilder, ServerMetadata, ServerSettings,
    SnapshotError, SnapshotProvider, WorldInfo,
};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::time::Duration;

/// Host stand-in with fixed answers
#[derive(Default, Clone)]
pub struct StaticHost {
    pub players: Vec<String>,
    pub max_players: u32,
    pub tps: Option<f64>,
    pub heap_used_mb: u64,
    pub heap_max_mb: u64,
    pub uptime_seconds: u64,
    pub worlds: Vec<WorldInfo>,
    pub metadata: ServerMetadata,
}

impl SnapshotProvider for StaticHost {
    fn online_player_names(&self) -> Vec<String> {
        self.players.clone()
    }
    fn max_players(&self) -> u32 {
        self.max_players
    }
    fn tps(&self) -> Result<f64, SnapshotError> {
        self.tps
            .ok_or_else(|| SnapshotError::Failed("recentTps field not found".to_string()))
    }
    fn heap_used_mb(&self) -> u64 {
        self.heap_used_mb
    }
    fn heap_max_mb(&self) -> u64 {
        self.heap_max_mb
    }
    fn uptime_seconds(&self) -> u64 {
        self.uptime_seconds
    }
    fn worlds(&self) -> Vec<WorldInfo> {
        self.worlds.clone()
    }
    fn server_metadata(&self) -> ServerMetadata {
        self.metadata.clone()
    }
}

/// Start a loopback server on an ephemeral port
pub fn start(provider: Arc<dyn SnapshotProvider>) -> (Server, SocketAddr) {
    let mut server = ServerBuilder::new()
        .settings(ServerSettings::development())
        .identity(ApiIdentity::default())
        .not_found(NotFoundPolicy::Ok)
        .build(provider);
    let addr = server.start().expect("server starts");
    (server, addr)
}

/// Parsed raw HTTP response
#[derive(Debug)]
pub struct RawResponse {
    pub status_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RawResponse {
    pub fn parse(raw: &str) -> Self {
        let (head, body) = raw.split_once("\r\n\r\n").expect("header terminator");
        let mut lines = head.split("\r\n");
        let status_line = lines.next().unwrap_or_default().to_string();
        let headers = lines
            .filter_map(|line| line.split_once(": "))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Self {
            status_line,
            headers,
            body: body.to_string(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("valid JSON body")
    }
}

/// Connect with a read timeout so a broken server fails the test instead of hanging
pub fn connect(addr: SocketAddr) -> TcpStream {
    let stream = TcpStream::connect(addr).expect("connect");
    stream
        .set_read_timeout(Some(Duration::from_secs(10)))
        .unwrap();
    stream
}

/// Read until the server closes
pub fn read_all(mut stream: TcpStream) -> RawResponse {
    let mut raw = String::new();
    stream.read_to_string(&mut raw).expect("read response");
    RawResponse::parse(&raw)
}

/// Send one request and read the whole response
pub fn send(addr: SocketAddr, method: &str, path: &str) -> RawResponse {
    let mut stream = connect(addr);
    write!(stream, "{method} {path} HTTP/1.1\r\nHost: localhost\r\nUser-Agent: test\r\n\r\n").unwrap();
    read_all(stream)
}
