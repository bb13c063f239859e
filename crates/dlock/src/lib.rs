//! # dlock
//!
//! Mutual-exclusion locks whose state lives in Redis, so independent
//! processes can serialize access to a critical section named by a string
//! key.
//!
//! A lock is a single record created with `SET key token NX EX seconds` and
//! deleted only by the holder of `token` through an atomic
//! compare-and-delete script. The expiry is the crash-recovery net: a holder
//! that dies without releasing blocks others for at most `expire`.
//!
//! ## Example
//!
//! ```ignore
//! use dlock::{EndpointConfig, GuardInvoker, LockKey, LockOptions, LockOutcome, StoreConnectionPool};
//! use std::time::Duration;
//!
//! let endpoint = EndpointConfig::new("localhost", 6379);
//! let invoker = GuardInvoker::new(StoreConnectionPool::global().for_endpoint(endpoint));
//!
//! let key = LockKey::new("order:42")?;
//! let options = LockOptions::default().with_wait(Duration::from_secs(2));
//! match invoker.run(&key, options, || async { ship_order(42).await }).await? {
//!     LockOutcome::Acquired(result) => result?,
//!     LockOutcome::Contended => println!("order 42 is being shipped elsewhere"),
//! }
//! ```
//!
//! ## Architecture
//!
//! - `domain` - errors, value objects and the store ports
//! - `application` - lock coordinator and guarded execution
//! - `providers` - Redis and in-memory store connections
//! - `infrastructure` - connection pools, configuration, logging

/// Domain layer - errors, value objects and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use dlock_domain::*;
}

/// Application layer - lock protocol and guarded execution
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use dlock_application::*;
}

/// Store providers
///
/// Re-exports from the providers crate for convenience
pub mod providers {
    pub use dlock_providers::*;
}

/// Infrastructure layer - pools, configuration and logging
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use dlock_infrastructure::*;
}

// Re-export the types most callers need
pub use dlock_application::{GuardInvoker, LockCoordinator, run_with_lock};
pub use dlock_domain::{
    EndpointConfig, Error, LockKey, LockOptions, LockOutcome, OwnershipToken, Result,
};
pub use dlock_infrastructure::{ConfigLoader, StoreConnectionPool};
pub use dlock_providers::store::MemoryLockStore;
