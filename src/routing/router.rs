//! Route classification.
//!
//! # Responsibilities
//! - Decide which backend owns a request path
//! - Hand the dispatcher the upstream for proxied targets
//!
//! # Design Decisions
//! - Immutable after construction (shared without locks)
//! - Exactly one target per path, never a "no match"

use std::fmt;

use crate::config::{ProxyConfig, UpstreamTarget};
use crate::routing::matcher::PathPrefixMatcher;

/// Where a request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteTarget {
    /// Backend API server.
    Api,
    /// Live front-end dev server (live mode only).
    LiveFrontend,
    /// Compiled bundle on disk (static mode only).
    StaticFiles,
}

impl RouteTarget {
    /// Short tag used in logs and metric labels.
    pub fn label(&self) -> &'static str {
        match self {
            RouteTarget::Api => "API",
            RouteTarget::LiveFrontend => "LIVE",
            RouteTarget::StaticFiles => "STATIC",
        }
    }
}

impl fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies request paths.
#[derive(Debug, Clone)]
pub struct Router {
    api_prefix: PathPrefixMatcher,
    api: UpstreamTarget,
    live: Option<UpstreamTarget>,
}

impl Router {
    pub fn from_config(config: &ProxyConfig) -> Self {
        Self {
            api_prefix: PathPrefixMatcher::new(config.api_prefix.clone()),
            api: config.api_target.clone(),
            live: config.live_target.clone(),
        }
    }

    /// Classify a request path (without query string).
    pub fn classify(&self, path: &str) -> RouteTarget {
        if self.api_prefix.matches(path) {
            RouteTarget::Api
        } else if self.live.is_some() {
            RouteTarget::LiveFrontend
        } else {
            RouteTarget::StaticFiles
        }
    }

    /// Upstream a target is forwarded to. `None` for static files.
    pub fn upstream(&self, target: RouteTarget) -> Option<&UpstreamTarget> {
        match target {
            RouteTarget::Api => Some(&self.api),
            RouteTarget::LiveFrontend => self.live.as_ref(),
            RouteTarget::StaticFiles => None,
        }
    }
}
