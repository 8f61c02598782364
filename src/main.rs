//! LLM Proxy Server
//!
//! A transparent reverse proxy built with Tokio and Axum. Every inbound
//! request is forwarded to a single configured upstream with its path and
//! query untouched; responses come back buffered, or streamed when the
//! upstream speaks Server-Sent Events. A local `/health` endpoint answers
//! without contacting the upstream.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────┐
//!                      │                  LLM PROXY                    │
//!      Client Request  │  ┌──────────┐   ┌────────────┐   ┌─────────┐  │
//!      ────────────────┼─▶│ listener │──▶│ translator │──▶│ http    │──┼──▶ Upstream
//!                      │  └──────────┘   │ (headers,  │   │ client  │  │    Server
//!                      │                 │  body)     │   └────┬────┘  │
//!                      │                 └────────────┘        │       │
//!      Client Response │  ┌──────────────────────────────┐     │       │
//!      ◀───────────────┼──│ dispatcher (stream / buffer) │◀────┘       │
//!                      │  └──────────────────────────────┘             │
//!                      │                                               │
//!                      │  ┌─────────────────────────────────────────┐  │
//!                      │  │  config (env) · health · CORS · logging │  │
//!                      │  └─────────────────────────────────────────┘  │
//!                      └───────────────────────────────────────────────┘
//! ```

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use llm_proxy::config;
use llm_proxy::http::HttpServer;

#[tokio::main]
async fn main() {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "llm_proxy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("llm-proxy v0.1.0 starting");

    let config = match config::load_from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    tracing::info!(
        bind_address = %config.bind_address(),
        upstream_url = %config.upstream_url,
        "Configuration loaded"
    );

    let listener = match TcpListener::bind(config.bind_address()).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(
                error = %e,
                address = %config.bind_address(),
                "Failed to bind listener"
            );
            std::process::exit(1);
        }
    };

    let server = HttpServer::new(config);
    if let Err(e) = server.run(listener).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }

    tracing::info!("Shutdown complete");
}
