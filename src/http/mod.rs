//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, health route, proxy handler)
//!     → body.rs (classify the inbound body once)
//!     → request.rs (translate into the upstream request)
//!     → upstream call (hyper client)
//!     → response.rs (streaming or buffered relay)
//!     → Send to client
//! ```

pub mod body;
pub mod error;
pub mod health;
pub mod request;
pub mod response;
pub mod server;

pub use error::ProxyError;
pub use server::HttpServer;
