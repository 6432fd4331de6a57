//! HTTP request-line parser
//!
//! Only the request line carries information for this API. Header lines are
//! consumed up to the blank line so the socket is drained before we reply;
//! bodies are never read.

use super::Method;
use std::io::{self, BufRead, Read};
use std::str;
use thiserror::Error;

/// Longest accepted line, request line or header
pub const MAX_LINE_LEN: usize = 8 * 1024;

/// Most header lines drained before giving up
pub const MAX_HEADER_LINES: usize = 64;

/// Parsed request: just enough to route
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
}

/// Parse errors. Every variant drops the connection without a reply.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("connection closed before a request line arrived")]
    ConnectionClosed,
    #[error("malformed request line")]
    MalformedRequestLine,
    #[error("line exceeds {} bytes", MAX_LINE_LEN)]
    LineTooLong,
    #[error("more than {} header lines", MAX_HEADER_LINES)]
    TooManyHeaders,
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
}

enum State {
    AwaitingRequestLine,
    Headers { request: Request, seen: usize },
    Done(Request),
}

impl Request {
    /// Parse a single request line: `<METHOD> <PATH> [<VERSION>]`
    pub fn parse_line(line: &[u8]) -> Result<Self, ParseError> {
        let line = line.trim_ascii_end();
        let mut parts = line.split(|&b| b == b' ').filter(|part| !part.is_empty());

        let method = parts.next().ok_or(ParseError::MalformedRequestLine)?;
        let path = parts
            .next()
            .and_then(|p| str::from_utf8(p).ok())
            .ok_or(ParseError::MalformedRequestLine)?;

        Ok(Request {
            method: Method::from_bytes(method),
            path: path.to_string(),
        })
    }
}

/// Read one request from the stream, draining its header block.
pub fn read_request<R: BufRead>(reader: &mut R) -> Result<Request, ParseError> {
    let mut line = Vec::with_capacity(256);
    let mut state = State::AwaitingRequestLine;

    loop {
        state = match state {
            State::AwaitingRequestLine => {
                if read_line(reader, &mut line)? == 0 {
                    return Err(ParseError::ConnectionClosed);
                }
                State::Headers {
                    request: Request::parse_line(&line)?,
                    seen: 0,
                }
            }
            State::Headers { request, seen } => {
                // EOF also ends the header block
                if read_line(reader, &mut line)? == 0 || line.trim_ascii().is_empty() {
                    State::Done(request)
                } else if seen >= MAX_HEADER_LINES {
                    return Err(ParseError::TooManyHeaders);
                } else {
                    State::Headers { request, seen: seen + 1 }
                }
            }
            State::Done(request) => return Ok(request),
        };
    }
}

/// Read up to and including `\n`, bounded by `MAX_LINE_LEN`
fn read_line<R: BufRead>(reader: &mut R, line: &mut Vec<u8>) -> Result<usize, ParseError> {
    line.clear();
    let n = reader
        .by_ref()
        .take(MAX_LINE_LEN as u64 + 1)
        .read_until(b'\n', line)?;

    if n > MAX_LINE_LEN {
        return Err(ParseError::LineTooLong);
    }
    Ok(n)
}
