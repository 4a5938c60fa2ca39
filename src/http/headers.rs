//! Hop-by-hop header filtering.
//!
//! These headers describe a single connection leg. They are dropped from the
//! request sent upstream and from the response relayed to the client; every
//! other header is copied as-is, duplicates and order included.

use axum::http::{HeaderMap, HeaderName};

/// Headers never copied across the proxy, in either direction.
pub const HOP_BY_HOP_HEADERS: [&str; 4] = ["host", "connection", "keep-alive", "transfer-encoding"];

/// `HeaderName`s are always lowercase, so a plain comparison is enough.
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}

/// Copy of `headers` without the hop-by-hop set.
pub fn end_to_end_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !is_hop_by_hop(name) {
            filtered.append(name.clone(), value.clone());
        }
    }
    filtered
}
