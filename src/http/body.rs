//! Inbound body classification.
//!
//! The body's shape is decided exactly once, when the inbound request is
//! read; translation to the outbound encoding is a pure function over that
//! shape. This keeps type inspection out of the forwarding path.

use axum::body::Bytes;
use serde_json::Value;

/// An inbound request body, classified at parse time.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundBody {
    /// Parsed JSON, seen under an `application/json` content type.
    Json(Value),
    /// Valid UTF-8 text.
    Text(String),
    /// Raw bytes.
    Binary(Bytes),
}

impl InboundBody {
    /// Classify raw body bytes against the declared content type. Returns
    /// `None` for an empty body.
    pub fn classify(bytes: Bytes, content_type: &str) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }
        if content_type.contains("application/json") {
            if let Ok(value) = serde_json::from_slice(&bytes) {
                return Some(Self::Json(value));
            }
        }
        match String::from_utf8(Vec::from(bytes)) {
            Ok(text) => Some(Self::Text(text)),
            Err(err) => Some(Self::Binary(Bytes::from(err.into_bytes()))),
        }
    }

    /// Encode for the upstream request. JSON values re-serialize to JSON
    /// text; text and binary bodies pass through unchanged. Structured
    /// values are treated as JSON regardless of what the content type
    /// claimed, matching the forwarding behavior this proxy replaces.
    pub fn into_bytes(self) -> Result<Bytes, serde_json::Error> {
        match self {
            Self::Json(value) => serde_json::to_vec(&value).map(Bytes::from),
            Self::Text(text) => Ok(Bytes::from(text)),
            Self::Binary(bytes) => Ok(bytes),
        }
    }
}
