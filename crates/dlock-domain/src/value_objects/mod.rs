//! Domain Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`LockKey`] | Name of a protected resource |
//! | [`OwnershipToken`] | Per-attempt proof of lock ownership |
//! | [`LockOptions`] | Expiry and wait budget of a guarded run |
//! | [`LockOutcome`] | Result of a guarded run: acquired or contended |
//! | [`EndpointConfig`] | Resolved store connection parameters |

/// Store endpoint value objects
pub mod endpoint;
/// Lock value objects
pub mod lock;

pub use endpoint::{EndpointConfig, EndpointIdentity};
pub use lock::{LockKey, LockOptions, LockOutcome, OwnershipToken, expire_to_secs};
