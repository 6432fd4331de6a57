//! Minimal HTTP/1.1 over raw sockets
//!
//! One request per connection: read the request line, route, write one
//! response, close.

use std::io::BufReader;
use std::net::{Shutdown, TcpStream};
use std::time::Duration;
use tracing::{debug, warn};

mod parser;
mod response;
mod router;
mod server_config;
mod thread_pool;

pub use parser::{MAX_HEADER_LINES, MAX_LINE_LEN, ParseError, Request, read_request};
pub use response::{CORS_HEADERS, JSON_CONTENT_TYPE, Response, Status};
pub use router::{Handler, Match, Router};
pub use server_config::{DEFAULT_PORT, DEFAULT_WORKERS, ServerSettings};
pub(crate) use server_config::wake_addr;
pub use thread_pool::{PoolClosed, ThreadPool};

/// HTTP methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
    HEAD,
    OPTIONS,
    PATCH,
    /// Any other token; routed like a GET
    Other,
}

impl Method {
    /// Parse method from bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match bytes {
            b"GET" => Self::GET,
            b"POST" => Self::POST,
            b"PUT" => Self::PUT,
            b"DELETE" => Self::DELETE,
            b"HEAD" => Self::HEAD,
            b"OPTIONS" => Self::OPTIONS,
            b"PATCH" => Self::PATCH,
            _ => Self::Other,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GET => "GET",
            Self::POST => "POST",
            Self::PUT => "PUT",
            Self::DELETE => "DELETE",
            Self::HEAD => "HEAD",
            Self::OPTIONS => "OPTIONS",
            Self::PATCH => "PATCH",
            Self::Other => "OTHER",
        }
    }
}

/// Handle a single TCP connection, start to finish
pub fn handle_connection(stream: TcpStream, router: &Router, read_timeout: Option<Duration>) {
    let peer = stream.peer_addr().ok();

    if read_timeout.is_some() {
        if let Err(e) = stream.set_read_timeout(read_timeout) {
            warn!(?peer, error = %e, "failed to set read timeout");
        }
    }

    let mut reader = BufReader::new(&stream);
    let request = match read_request(&mut reader) {
        Ok(request) => request,
        Err(ParseError::ConnectionClosed) => {
            debug!(?peer, "client closed without sending a request");
            return;
        }
        Err(ParseError::Io(e)) => {
            warn!(?peer, error = %e, "error reading request");
            return;
        }
        Err(e) => {
            debug!(?peer, error = %e, "dropping malformed request");
            return;
        }
    };

    debug!(?peer, method = request.method.as_str(), path = %request.path, "request");

    let response = router.handle(&request);
    let mut writer = &stream;
    if let Err(e) = response.write_to(&mut writer) {
        warn!(?peer, error = %e, "error writing response");
    }

    // Never keep-alive
    let _ = stream.shutdown(Shutdown::Both);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn serve_once(router: Router) -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            handle_connection(stream, &router, None);
        });
        addr
    }

    fn echo_router() -> Router {
        let mut router = Router::new(|_| Response::json(r#"{"error":"Not found"}"#));
        router.prefix("/api/echo", |req| Response::json(format!("{{\"path\":\"{}\"}}", req.path)));
        router
    }

    #[test]
    fn test_method_round_trip() {
        for method in [Method::GET, Method::POST, Method::OPTIONS, Method::PATCH] {
            assert_eq!(Method::from_bytes(method.as_str().as_bytes()), method);
        }
        assert_eq!(Method::from_bytes(b"get"), Method::Other);
    }

    #[test]
    fn test_connection_gets_one_response_then_eof() {
        let addr = serve_once(echo_router());
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(b"GET /api/echo HTTP/1.1\r\nHost: x\r\nConnection: keep-alive\r\n\r\n").unwrap();

        let mut text = String::new();
        stream.read_to_string(&mut text).unwrap();

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.ends_with(r#"{"path":"/api/echo"}"#));
    }

    #[test]
    fn test_malformed_request_is_dropped_silently() {
        let addr = serve_once(echo_router());
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(b"GARBAGE\r\n\r\n").unwrap();

        let mut buf = Vec::new();
        // Either a clean EOF or a reset; never a response
        let _ = stream.read_to_end(&mut buf);
        assert!(buf.is_empty());
    }
}
