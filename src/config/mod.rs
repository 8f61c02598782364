//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! environment variables
//!     → loader.rs (read & validate)
//!     → schema.rs types (immutable)
//!     → shared via Arc with the request handler
//! ```
//!
//! # Design Decisions
//! - Config is resolved once at startup and read-only thereafter
//! - Every field has a default so the proxy runs with no environment set
//! - Invalid values are fatal at startup, never silently defaulted

pub mod loader;
pub mod schema;

pub use loader::{load_from_env, ConfigError};
pub use schema::ProxyConfig;
