//! Responses generated by the proxy itself.
//!
//! Upstream responses, error statuses included, are relayed untouched by
//! `forward.rs`; this module only covers what the proxy answers on its own.

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, StatusCode},
    response::Response,
};

/// Plain-text response with the given status.
pub fn text(status: StatusCode, message: impl Into<String>) -> Response {
    let mut response = Response::new(Body::from(message.into()));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

/// 405 for writes in static mode, where there is nothing to write to.
pub fn method_not_allowed(method: &Method) -> Response {
    let mut response = text(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("Method {method} not allowed: static files are read-only"),
    );
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static("GET, HEAD"));
    response
}

/// 501 for methods the proxy does not handle at all.
pub fn not_implemented(method: &Method) -> Response {
    text(
        StatusCode::NOT_IMPLEMENTED,
        format!("Unsupported method ({method})"),
    )
}
