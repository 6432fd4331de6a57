//! HTTP response writer

use std::io::{Result as IoResult, Write};

/// CORS headers sent on every response
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

/// Content type of every JSON body
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// HTTP status codes
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(u16)]
pub enum Status {
    Ok = 200,
    NotFound = 404,
}

impl Status {
    /// Numeric code
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Get status text
    pub fn text(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NotFound => "Not Found",
        }
    }
}

/// HTTP response
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub(crate) status: Status,
    /// `None` for preflight answers, which carry no entity headers
    pub(crate) content_type: Option<&'static str>,
    pub(crate) body: Vec<u8>,
}

impl Response {
    /// 200 response carrying a JSON document
    pub fn json(body: impl Into<String>) -> Self {
        Self::json_with_status(Status::Ok, body)
    }

    /// JSON response with an explicit status
    pub fn json_with_status(status: Status, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: Some(JSON_CONTENT_TYPE),
            body: body.into().into_bytes(),
        }
    }

    /// CORS preflight answer: 200, CORS headers, empty body
    pub fn preflight() -> Self {
        Self {
            status: Status::Ok,
            content_type: None,
            body: Vec::new(),
        }
    }

    /// Response status
    pub fn status(&self) -> Status {
        self.status
    }

    /// Response body bytes
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Write response to stream
    pub fn write_to<W: Write>(&self, writer: &mut W) -> IoResult<()> {
        let mut head = format!("HTTP/1.1 {} {}\r\n", self.status.code(), self.status.text());

        for (key, value) in CORS_HEADERS {
            head.push_str(&format!("{key}: {value}\r\n"));
        }

        if let Some(content_type) = self.content_type {
            head.push_str(&format!("Content-Type: {content_type}\r\n"));
            head.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
        }

        head.push_str("\r\n");

        writer.write_all(head.as_bytes())?;
        writer.write_all(&self.body)?;
        writer.flush()
    }
}
