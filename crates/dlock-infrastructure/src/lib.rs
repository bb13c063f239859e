//! # Infrastructure Layer
//!
//! Cross-cutting technical concerns around the lock protocol.
//!
//! ## Module Categories
//!
//! ### Store Access
//! | Module | Description |
//! |--------|-------------|
//! | [`pool`] | Process-wide registry of per-endpoint connection pools |
//!
//! ### Configuration
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | TOML + environment configuration via Figment |
//! | [`constants`] | Centralized configuration constants |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |
//! | [`error_ext`] | Context helpers converting foreign errors |

pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;
pub mod pool;

// Re-export commonly used types
pub use config::{AppConfig, ConfigLoader};
pub use error_ext::ErrorContext;
pub use pool::{EndpointPool, EndpointSource, PoolStats, PooledConnection, StoreConnectionPool};
