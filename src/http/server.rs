//! HTTP server setup and request forwarding.
//!
//! # Responsibilities
//! - Create the Axum router: `/health` first, then the catch-all proxy route
//! - Wire up middleware (CORS, request tracing)
//! - Hold the shared application state (config, upstream client, start time)
//! - Forward every non-health request to the configured upstream

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::header;
use axum::response::Response;
use axum::routing::any;
use axum::Router;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::ProxyConfig;
use crate::http::body::InboundBody;
use crate::http::error::ProxyError;
use crate::http::health::health_handler;
use crate::http::request::build_upstream_request;
use crate::http::response::{is_event_stream, relay_buffered, relay_streaming, relayed_headers};

/// Application state injected into handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub client: Client<HttpConnector, Body>,
    pub started_at: Instant,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            config: Arc::new(config.clone()),
            client,
            started_at: Instant::now(),
        };

        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers. The CORS layer owns
    /// the whole `access-control-` response surface: origin mirrored,
    /// credentials allowed, preflight answered without contacting upstream.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/health", any(health_handler))
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(CorsLayer::very_permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream_url = %self.config.upstream_url,
            "Proxy server listening"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main proxy handler: classify the body once, translate the request,
/// dispatch upstream, and relay the response in whichever mode it calls for.
async fn proxy_handler(
    State(state): State<AppState>,
    ConnectInfo(client_addr): ConnectInfo<SocketAddr>,
    request: Request,
) -> Result<Response, ProxyError> {
    let request_id = Uuid::new_v4();
    let (parts, body) = request.into_parts();

    tracing::debug!(
        request_id = %request_id,
        client = %client_addr,
        method = %parts.method,
        path = %parts.uri.path(),
        "Proxying request"
    );

    let body_bytes = axum::body::to_bytes(body, usize::MAX).await?;
    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    let inbound_body = InboundBody::classify(body_bytes, content_type);

    let upstream_request = build_upstream_request(&parts, inbound_body, &state.config.upstream_url)?;
    let upstream_response = state.client.request(upstream_request).await?;

    let (upstream_parts, upstream_body) = upstream_response.into_parts();
    let headers = relayed_headers(&upstream_parts.headers);
    let upstream_body = Body::new(upstream_body);

    if is_event_stream(&upstream_parts.headers, &parts.headers) {
        tracing::debug!(
            request_id = %request_id,
            status = %upstream_parts.status,
            "Relaying event stream"
        );
        Ok(relay_streaming(upstream_parts.status, headers, upstream_body))
    } else {
        relay_buffered(upstream_parts.status, headers, upstream_body).await
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
