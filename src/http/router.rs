//! HTTP request router
//!
//! Routes are tested in registration order and the first match wins. The
//! table is built once, then shared read-only across workers.

use super::{Method, Request, Response};
use std::sync::Arc;

/// Handler function type
pub type Handler = Arc<dyn Fn(&Request) -> Response + Send + Sync + 'static>;

/// How a route pattern is compared against the request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    /// Path starts with the pattern
    Prefix,
    /// Path equals the pattern
    Exact,
}

struct Route {
    pattern: String,
    kind: Match,
    handler: Handler,
}

impl Route {
    fn matches(&self, path: &str) -> bool {
        match self.kind {
            Match::Prefix => path.starts_with(&self.pattern),
            Match::Exact => path == self.pattern,
        }
    }
}

/// Ordered, prefix-matching router
pub struct Router {
    routes: Vec<Route>,
    fallback: Handler,
}

impl Router {
    /// Create a router whose unmatched requests go to `fallback`
    pub fn new(fallback: impl Fn(&Request) -> Response + Send + Sync + 'static) -> Self {
        Self {
            routes: Vec::new(),
            fallback: Arc::new(fallback),
        }
    }

    /// Add a route matching every path that starts with `prefix`
    pub fn prefix(&mut self, prefix: &str, handler: impl Fn(&Request) -> Response + Send + Sync + 'static) {
        self.route(Match::Prefix, prefix, handler);
    }

    /// Add a route matching `path` exactly
    pub fn exact(&mut self, path: &str, handler: impl Fn(&Request) -> Response + Send + Sync + 'static) {
        self.route(Match::Exact, path, handler);
    }

    /// Add route handler
    pub fn route(&mut self, kind: Match, pattern: &str, handler: impl Fn(&Request) -> Response + Send + Sync + 'static) {
        self.routes.push(Route {
            pattern: pattern.to_string(),
            kind,
            handler: Arc::new(handler),
        });
    }

    /// Number of registered routes
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when only the fallback is registered
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Handle request
    pub fn handle(&self, request: &Request) -> Response {
        // Preflight never reaches a handler
        if request.method == Method::OPTIONS {
            return Response::preflight();
        }

        let handler = self
            .routes
            .iter()
            .find(|route| route.matches(&request.path))
            .map_or(&self.fallback, |route| &route.handler);

        handler(request)
    }
}
