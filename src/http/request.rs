//! Inbound-to-upstream request translation.
//!
//! # Responsibilities
//! - Build the upstream target URI (path and query relayed verbatim)
//! - Rebuild headers through a deny-list, never mutating the inbound map
//! - Encode the classified body; GET and HEAD never carry one

use axum::body::Body;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, Method, Request, Uri};

use crate::http::body::InboundBody;
use crate::http::error::ProxyError;

/// Headers that belong to the client-to-proxy leg. `host` names this proxy,
/// not the upstream; `content-length` is recomputed by the client transport
/// once the body has been re-encoded.
const DENIED_REQUEST_HEADERS: [header::HeaderName; 2] = [header::HOST, header::CONTENT_LENGTH];

/// Copy inbound headers into a fresh map, skipping the denied set.
/// Multi-value headers survive via `append`.
pub fn proxy_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if DENIED_REQUEST_HEADERS.contains(name) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

/// Join the upstream base URL and the inbound path-and-query. Plain string
/// concatenation: the upstream must see the caller's bytes unchanged, so
/// there is no re-encoding or normalization here.
pub fn target_uri(upstream_url: &str, inbound: &Uri) -> Result<Uri, ProxyError> {
    let path_and_query = inbound
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    Ok(Uri::try_from(format!("{}{}", upstream_url, path_and_query))?)
}

/// Translate an inbound request into the outbound request sent upstream.
pub fn build_upstream_request(
    parts: &Parts,
    body: Option<InboundBody>,
    upstream_url: &str,
) -> Result<Request<Body>, ProxyError> {
    let uri = target_uri(upstream_url, &parts.uri)?;

    let mut builder = Request::builder().method(parts.method.clone()).uri(uri);
    if let Some(headers) = builder.headers_mut() {
        *headers = proxy_headers(&parts.headers);
    }

    let outbound_body = match body {
        Some(body) if parts.method != Method::GET && parts.method != Method::HEAD => {
            Body::from(body.into_bytes()?)
        }
        _ => Body::empty(),
    };

    Ok(builder.body(outbound_body)?)
}
