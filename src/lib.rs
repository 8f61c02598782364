//! Transparent reverse proxy for a single upstream LLM server.

pub mod config;
pub mod http;

pub use config::ProxyConfig;
pub use http::HttpServer;
