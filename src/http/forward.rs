//! Upstream forwarding.
//!
//! # Responsibilities
//! - Build the upstream URL (base + original path and query, no rewriting)
//! - Copy end-to-end headers, method and body to the outbound request
//! - Relay the upstream status, headers and body back to the client
//! - Turn network failures into a 502 naming the upstream
//!
//! # Design Decisions
//! - Exactly one upstream round trip per request; no retries
//! - Upstream 4xx/5xx are content, not proxy failures
//! - Response bodies are streamed through, never buffered
//! - The response-head wait is bounded by `timeouts.upstream_secs`; a
//!   body that stalls after the head arrived is not cut off

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;

use crate::config::{TimeoutConfig, UpstreamTarget};
use crate::http::headers::end_to_end_headers;
use crate::http::request::InboundRequest;
use crate::http::response;

/// The upstream could not be reached or did not answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Upstream unreachable ({upstream}): {reason}")]
pub struct UpstreamUnreachable {
    pub upstream: UpstreamTarget,
    pub reason: String,
}

/// Result of one forwarding attempt.
#[derive(Debug)]
pub enum ForwardOutcome {
    /// Upstream answered with a 1xx/2xx/3xx status.
    Success(Response),
    /// Upstream answered with a 4xx/5xx status. Relayed like a success.
    UpstreamHttpStatus(Response),
    /// No well-formed reply.
    Unreachable(UpstreamUnreachable),
}

impl ForwardOutcome {
    /// Status the client will see.
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardOutcome::Success(r) | ForwardOutcome::UpstreamHttpStatus(r) => r.status(),
            ForwardOutcome::Unreachable(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ForwardOutcome {
    fn into_response(self) -> Response {
        match self {
            ForwardOutcome::Success(r) | ForwardOutcome::UpstreamHttpStatus(r) => r,
            ForwardOutcome::Unreachable(err) => {
                response::text(StatusCode::BAD_GATEWAY, err.to_string())
            }
        }
    }
}

/// Sends requests to upstreams over a pooled HTTP/1.1 client.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    upstream_timeout: Duration,
}

impl Forwarder {
    pub fn new(timeouts: &TimeoutConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            upstream_timeout: Duration::from_secs(timeouts.upstream_secs),
        }
    }

    /// Forward `request` to `upstream` and wait for the response head.
    pub async fn forward(&self, request: InboundRequest, upstream: &UpstreamTarget) -> ForwardOutcome {
        let unreachable = |reason: String| {
            ForwardOutcome::Unreachable(UpstreamUnreachable {
                upstream: upstream.clone(),
                reason,
            })
        };

        let url = upstream.url_for(&request.path_and_query);
        let outbound = match build_outbound(request, &url) {
            Ok(req) => req,
            Err(e) => return unreachable(format!("invalid upstream URL {url}: {e}")),
        };

        tracing::debug!(url = %url, method = %outbound.method(), "Forwarding upstream");

        match tokio::time::timeout(self.upstream_timeout, self.client.request(outbound)).await {
            Err(_) => unreachable(format!(
                "no response within {}s",
                self.upstream_timeout.as_secs()
            )),
            Ok(Err(e)) => unreachable(error_chain(&e)),
            Ok(Ok(upstream_response)) => {
                let relayed = relay_response(upstream_response);
                let status = relayed.status();
                if status.is_client_error() || status.is_server_error() {
                    ForwardOutcome::UpstreamHttpStatus(relayed)
                } else {
                    ForwardOutcome::Success(relayed)
                }
            }
        }
    }
}

/// Outbound request: same method, end-to-end headers, body only if one came in.
/// `Host` is filled in by the client from the upstream URL.
fn build_outbound(request: InboundRequest, url: &str) -> Result<Request<Body>, axum::http::Error> {
    let mut builder = Request::builder().method(request.method).uri(url);
    if let Some(headers) = builder.headers_mut() {
        *headers = end_to_end_headers(&request.headers);
    }
    builder.body(request.body.map(Body::from).unwrap_or_else(Body::empty))
}

fn relay_response(upstream: hyper::Response<Incoming>) -> Response {
    let (parts, body) = upstream.into_parts();
    let mut relayed = Response::new(Body::new(body));
    *relayed.status_mut() = parts.status;
    *relayed.headers_mut() = end_to_end_headers(&parts.headers);
    relayed
}

/// `outer: cause: root cause`, so "client error (Connect)" carries the
/// actual socket error with it.
fn error_chain(err: &dyn StdError) -> String {
    let mut reason = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }
    reason
}
