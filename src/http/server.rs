//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with a single catch-all dispatcher
//! - Classify each request and hand it to exactly one strategy:
//!   the forwarder (API / live front-end) or the static resolver
//! - Enforce the method table (405 / 501) before any upstream is contacted
//! - Record one log line and one metric sample per request
//! - Stop accepting immediately when the shutdown signal fires

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    response::{IntoResponse, Response},
    Router,
};
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::{ProxyConfig, UpstreamTarget};
use crate::http::forward::{ForwardOutcome, Forwarder};
use crate::http::request::InboundRequest;
use crate::http::response;
use crate::http::static_files::StaticResolver;
use crate::observability::metrics;
use crate::routing::Router as ProxyRouter;

/// Application state injected into the dispatcher.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub router: Arc<ProxyRouter>,
    pub forwarder: Forwarder,
    pub static_files: Arc<StaticResolver>,
}

impl AppState {
    pub fn new(config: ProxyConfig) -> Self {
        Self {
            router: Arc::new(ProxyRouter::from_config(&config)),
            forwarder: Forwarder::new(&config.timeouts),
            static_files: Arc::new(StaticResolver::from_config(&config)),
            config: Arc::new(config),
        }
    }
}

/// HTTP server for the dev proxy.
pub struct HttpServer {
    router: Router,
    config: Arc<ProxyConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        let state = AppState::new(config);
        let config = state.config.clone();
        Self {
            router: Self::build_router(state),
            config,
        }
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Serve on `listener` until `shutdown` fires.
    ///
    /// In-flight requests are not drained: the listener is dropped as soon
    /// as the signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mode = %self.config.mode(),
            "HTTP server starting"
        );

        tokio::select! {
            result = axum::serve(listener, self.router).into_future() => result?,
            _ = shutdown.recv() => {
                tracing::debug!("Shutdown signal received, closing listener");
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: classify, then forward or serve.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let target = state.router.classify(request.uri().path());

    let response = match state.router.upstream(target) {
        Some(upstream) => forward_to(&state, request, upstream).await,
        None => serve_static(&state, request).await,
    };

    let status = response.status();
    let elapsed_ms = start_time.elapsed().as_millis() as u64;
    metrics::record_request(target, status.as_u16(), start_time);

    if status.is_server_error() {
        tracing::warn!(route = %target, method = %method, path = %path, status = status.as_u16(), elapsed_ms, "request");
    } else {
        tracing::info!(route = %target, method = %method, path = %path, status = status.as_u16(), elapsed_ms, "request");
    }

    response
}

async fn forward_to(state: &AppState, request: Request<Body>, upstream: &UpstreamTarget) -> Response {
    if request.method() != Method::GET && request.method() != Method::POST {
        return response::not_implemented(request.method());
    }

    let inbound = match InboundRequest::read(request, state.config.limits.max_body_bytes).await {
        Ok(inbound) => inbound,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected request body");
            return e.into_response();
        }
    };

    let outcome = state.forwarder.forward(inbound, upstream).await;
    if let ForwardOutcome::Unreachable(err) = &outcome {
        tracing::error!(upstream = %err.upstream, reason = %err.reason, "Upstream unreachable");
    }
    outcome.into_response()
}

async fn serve_static(state: &AppState, request: Request<Body>) -> Response {
    let method = request.method().clone();
    match method {
        Method::GET | Method::HEAD => state.static_files.serve(request).await,
        Method::POST => response::method_not_allowed(&method),
        _ => response::not_implemented(&method),
    }
}
