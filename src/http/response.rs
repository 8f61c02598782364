//! Upstream-to-client response relay.
//!
//! # Responsibilities
//! - Decide streaming vs. buffered relay for each upstream response
//! - Rebuild relayed headers through a deny-list
//! - Stream event-stream bodies chunk-by-chunk, never buffering them
//! - Buffer everything else, re-serializing JSON bodies tolerantly

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use futures_util::TryStreamExt;
use serde_json::Value;

use crate::http::error::ProxyError;

/// Upstream CORS headers are dropped: the proxy's own CORS layer owns that
/// surface, and forwarding both sides would produce conflicting headers.
/// Header names are normalized to lowercase, so a prefix check suffices.
const DENIED_RESPONSE_PREFIX: &str = "access-control-";

/// Decide whether the upstream response is relayed as a live event stream.
/// Either side can ask for it: the upstream by declaring the content type,
/// the caller through its `accept` header.
pub fn is_event_stream(upstream_headers: &HeaderMap, inbound_headers: &HeaderMap) -> bool {
    header_contains(upstream_headers, &header::CONTENT_TYPE, "text/event-stream")
        || header_contains(inbound_headers, &header::ACCEPT, "text/event-stream")
}

fn header_contains(headers: &HeaderMap, name: &header::HeaderName, needle: &str) -> bool {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains(needle))
}

/// Copy upstream headers into a fresh map, skipping the `access-control-`
/// family and the framing headers the outbound transport recomputes.
pub fn relayed_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream {
        if name.as_str().starts_with(DENIED_RESPONSE_PREFIX) {
            continue;
        }
        if name == &header::CONTENT_LENGTH || name == &header::TRANSFER_ENCODING {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

/// Relay a streaming response. Headers go out immediately; each upstream
/// chunk is forwarded as it arrives, so first-byte latency does not depend
/// on the stream's total length. Once headers are flushed the status can no
/// longer change, so a mid-stream failure is logged and the connection
/// simply terminates.
pub fn relay_streaming(status: StatusCode, mut headers: HeaderMap, upstream_body: Body) -> Response {
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));

    let chunks = upstream_body
        .into_data_stream()
        .inspect_err(|error| tracing::error!(error = %error, "Streaming relay interrupted"));

    assemble(status, headers, Body::from_stream(chunks))
}

/// Relay a buffered response. The whole upstream body is read as text; a
/// body declared as JSON is parsed and re-serialized, with parse failure
/// falling back to the raw text. Malformed upstream JSON is the upstream's
/// contract violation, not a proxy failure, so nothing is logged for it.
pub async fn relay_buffered(
    status: StatusCode,
    headers: HeaderMap,
    upstream_body: Body,
) -> Result<Response, ProxyError> {
    let bytes = axum::body::to_bytes(upstream_body, usize::MAX).await?;
    let text = String::from_utf8_lossy(&bytes).into_owned();

    let body = if header_contains(&headers, &header::CONTENT_TYPE, "application/json") {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Body::from(serde_json::to_vec(&value)?),
            Err(_) => Body::from(text),
        }
    } else {
        Body::from(text)
    };

    Ok(assemble(status, headers, body))
}

fn assemble(status: StatusCode, headers: HeaderMap, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
