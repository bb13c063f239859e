//! # dlock - Store Provider Implementations
//!
//! Implementations of the [`LockConnection`] port defined in `dlock-domain`.
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | Lock store | `LockConnection` | Redis, In-memory |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! dlock-providers = { version = "0.1", default-features = false, features = ["store-memory"] }
//! ```

// Re-export dlock-domain types commonly used with providers
pub use dlock_domain::error::{Error, Result};
pub use dlock_domain::ports::LockConnection;

pub mod store;
