//! Inbound request capture.
//!
//! # Responsibilities
//! - Read the request body eagerly, bounded by `limits.max_body_bytes`
//! - Keep method, path+query and headers exactly as received
//!
//! # Design Decisions
//! - The body is fully read before any upstream is contacted
//! - Declared `Content-Length` over the limit is rejected without reading
//! - An empty body is treated as absent

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;
use thiserror::Error;

use crate::http::response;

/// Failure to read an inbound body.
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("failed to read request body: {0}")]
    Read(String),
}

impl IntoResponse for BodyError {
    fn into_response(self) -> Response {
        let status = match self {
            BodyError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            BodyError::Read(_) => StatusCode::BAD_REQUEST,
        };
        response::text(status, self.to_string())
    }
}

/// A request read off the client connection.
#[derive(Debug)]
pub struct InboundRequest {
    pub method: Method,
    /// Path plus query string, as sent by the client.
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl InboundRequest {
    /// Consume an axum request, reading at most `limit` body bytes.
    pub async fn read(request: Request<Body>, limit: usize) -> Result<Self, BodyError> {
        let (parts, body) = request.into_parts();

        let declared = parts
            .headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());
        if declared.is_some_and(|len| len > limit) {
            return Err(BodyError::TooLarge { limit });
        }

        let bytes = axum::body::to_bytes(body, limit).await.map_err(|e| {
            let inner = e.into_inner();
            if inner.downcast_ref::<LengthLimitError>().is_some() {
                BodyError::TooLarge { limit }
            } else {
                BodyError::Read(inner.to_string())
            }
        })?;

        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        Ok(Self {
            method: parts.method,
            path_and_query,
            headers: parts.headers,
            body: (!bytes.is_empty()).then_some(bytes),
        })
    }

    /// Request path without the query string.
    pub fn path(&self) -> &str {
        self.path_and_query
            .split_once('?')
            .map_or(self.path_and_query.as_str(), |(path, _)| path)
    }
}
