//! Snapshot API route table
//!
//! Builds the fixed set of `/api/*` routes over a [`SnapshotProvider`].

use crate::config::ApiConfig;
use crate::http::{Response, Router, Status};
use crate::snapshot::SnapshotProvider;
use std::sync::Arc;

pub mod handlers;

/// Strings identifying this API in response bodies
#[derive(Debug, Clone, PartialEq)]
pub struct ApiIdentity {
    /// `source` field of status and performance
    pub source: String,
    /// `plugin` field of health, `message` of the directory
    pub plugin_name: String,
}

impl Default for ApiIdentity {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

impl From<&ApiConfig> for ApiIdentity {
    fn from(config: &ApiConfig) -> Self {
        Self {
            source: config.identity.source.clone(),
            plugin_name: config.identity.plugin_name.clone(),
        }
    }
}

/// Status used for unmatched paths
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotFoundPolicy {
    /// 200 with an `error` body, as existing dashboards expect
    #[default]
    Ok,
    /// 404 with the same body
    Status404,
}

impl NotFoundPolicy {
    /// Policy selected by `api.strict_not_found`
    pub fn from_strict(strict: bool) -> Self {
        if strict { Self::Status404 } else { Self::Ok }
    }

    /// The `{"error":"Not found"}` response under this policy
    pub fn response(self) -> Response {
        let status = match self {
            Self::Ok => Status::Ok,
            Self::Status404 => Status::NotFound,
        };
        Response::json_with_status(status, handlers::not_found().to_string())
    }
}

/// Build the route table. Order matters: first matching prefix wins.
pub fn routes(
    provider: Arc<dyn SnapshotProvider>,
    identity: ApiIdentity,
    not_found: NotFoundPolicy,
) -> Router {
    let identity = Arc::new(identity);
    let mut router = Router::new(move |_| not_found.response());

    {
        let (p, id) = (Arc::clone(&provider), Arc::clone(&identity));
        router.prefix("/api/status", move |_| {
            Response::json(handlers::status(p.as_ref(), &id).to_string())
        });
    }
    {
        let p = Arc::clone(&provider);
        router.prefix("/api/players", move |_| {
            Response::json(handlers::players(p.as_ref()).to_string())
        });
    }
    {
        let (p, id) = (Arc::clone(&provider), Arc::clone(&identity));
        router.prefix("/api/performance", move |_| {
            Response::json(handlers::performance(p.as_ref(), &id).to_string())
        });
    }
    {
        let p = Arc::clone(&provider);
        router.prefix("/api/world", move |_| {
            Response::json(handlers::world(p.as_ref()).to_string())
        });
    }
    {
        let p = Arc::clone(&provider);
        router.prefix("/api/server-info", move |_| {
            Response::json(handlers::server_info(p.as_ref()).to_string())
        });
    }
    {
        let (p, id) = (Arc::clone(&provider), Arc::clone(&identity));
        router.prefix("/api/health", move |_| {
            Response::json(handlers::health(p.as_ref(), &id).to_string())
        });
    }

    for root in ["/api/", "/api"] {
        let id = Arc::clone(&identity);
        router.exact(root, move |_| Response::json(handlers::directory(&id).to_string()));
    }

    router
}
