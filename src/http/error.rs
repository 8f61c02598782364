//! Request-path error definitions.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Marker carried in the `error` field of every proxy failure body.
pub const PROXY_FAILURE: &str = "Proxy request failed";

/// Errors on the forwarding path. Each one is isolated to its own request
/// and surfaced to the caller as a 500 with a structured body.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The upstream base URL plus the inbound path did not form a valid URI.
    #[error("invalid upstream target: {0}")]
    Target(#[from] axum::http::uri::InvalidUri),

    /// Assembling the outbound request failed.
    #[error("failed to build upstream request: {0}")]
    BuildRequest(#[from] axum::http::Error),

    /// Re-serializing a JSON body failed.
    #[error("failed to encode body: {0}")]
    EncodeBody(#[from] serde_json::Error),

    /// The upstream call itself failed (unreachable, refused, DNS).
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    /// Reading a body failed before any response was started.
    #[error("failed to read body: {0}")]
    ReadBody(#[from] axum::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Proxy request failed");
        let body = Json(serde_json::json!({
            "error": PROXY_FAILURE,
            "message": self.to_string(),
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
