//! Lock Store Implementations
//!
//! ## Available Providers
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | [`MemoryLockStore`] | Local | In-process store with TTL, for tests and single-process use |
//! | [`RedisConnection`] | Distributed | Redis-backed, shared by every process using the endpoint |
//!
//! ## Provider Selection Guide
//!
//! - **Testing**: Use `MemoryLockStore`; pause tokio time to exercise expiry
//! - **Multi Process**: Use `RedisConnection` through the infrastructure pool

#[cfg(feature = "store-memory")]
pub mod memory;
#[cfg(feature = "store-redis")]
pub mod redis;

#[cfg(feature = "store-memory")]
pub use self::memory::{MemoryConnection, MemoryLockStore};
#[cfg(feature = "store-redis")]
pub use self::redis::{RedisConnection, RedisConnectionManager};
