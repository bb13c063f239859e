//! Lock Store Port
//!
//! Defines the three primitives a backing store must offer to arbitrate
//! lock state. Any key-value store with TTL and an atomic
//! compare-and-delete can implement it.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// A checked-out connection to the store holding lock records
///
/// Implementations report communication failures as
/// [`Error::StoreUnavailable`](crate::error::Error::StoreUnavailable).
#[async_trait]
pub trait LockConnection: Send {
    /// Create `key = token` with the given TTL only if `key` is absent
    ///
    /// Must be a single atomic store operation. Returns `true` when the
    /// record was created.
    async fn set_if_absent(&mut self, key: &str, token: &str, ttl: Duration) -> Result<bool>;

    /// Delete `key` only if it currently holds `token`
    ///
    /// Must be a single atomic store operation. Returns `true` when the
    /// record was deleted.
    async fn compare_and_delete(&mut self, key: &str, token: &str) -> Result<bool>;

    /// Lightweight liveness probe
    async fn ping(&mut self) -> Result<()>;
}

#[async_trait]
impl<C: LockConnection + ?Sized> LockConnection for &mut C {
    async fn set_if_absent(&mut self, key: &str, token: &str, ttl: Duration) -> Result<bool> {
        (**self).set_if_absent(key, token, ttl).await
    }

    async fn compare_and_delete(&mut self, key: &str, token: &str) -> Result<bool> {
        (**self).compare_and_delete(key, token).await
    }

    async fn ping(&mut self) -> Result<()> {
        (**self).ping().await
    }
}

#[async_trait]
impl<C: LockConnection + ?Sized> LockConnection for Box<C> {
    async fn set_if_absent(&mut self, key: &str, token: &str, ttl: Duration) -> Result<bool> {
        (**self).set_if_absent(key, token, ttl).await
    }

    async fn compare_and_delete(&mut self, key: &str, token: &str) -> Result<bool> {
        (**self).compare_and_delete(key, token).await
    }

    async fn ping(&mut self) -> Result<()> {
        (**self).ping().await
    }
}
