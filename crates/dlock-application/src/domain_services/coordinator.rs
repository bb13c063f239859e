//! Lock coordinator
//!
//! Acquire and release semantics on top of a single checked-out
//! [`LockConnection`]. The coordinator keeps no state of its own: every
//! decision is made by the store's atomic primitives, so one instance can be
//! shared freely between tasks.
//!
//! ## Outcomes
//!
//! | Call | `Ok(true)` | `Ok(false)` | `Err` |
//! |------|-----------|-------------|-------|
//! | [`acquire`](LockCoordinator::acquire) | record created | key already held | store unavailable, bad expiry |
//! | [`acquire_with_wait`](LockCoordinator::acquire_with_wait) | created within the wait budget | held for the whole budget | store unavailable, bad expiry |
//! | [`release`](LockCoordinator::release) | our record deleted | expired or owned by another token | store unavailable |

use dlock_domain::constants::LOCK_POLL_INTERVAL;
use dlock_domain::error::Result;
use dlock_domain::ports::LockConnection;
use dlock_domain::value_objects::{LockKey, OwnershipToken, expire_to_secs};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Acquires and releases lock records through a store connection
#[derive(Debug, Clone, Copy)]
pub struct LockCoordinator {
    poll_interval: Duration,
}

impl LockCoordinator {
    /// Create a coordinator polling every 100 ms while waiting
    pub fn new() -> Self {
        Self {
            poll_interval: LOCK_POLL_INTERVAL,
        }
    }

    /// Override the delay between attempts while waiting
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Delay between attempts while waiting
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Try once to create the lock record for `key`
    ///
    /// Issues a single atomic set-if-absent with a TTL of `expire` (whole
    /// seconds, at least one). Losing the race is `Ok(false)`, not an error.
    pub async fn acquire<C>(
        &self,
        connection: &mut C,
        key: &LockKey,
        token: &OwnershipToken,
        expire: Duration,
    ) -> Result<bool>
    where
        C: LockConnection + ?Sized,
    {
        expire_to_secs(expire)?;
        let acquired = connection
            .set_if_absent(key.as_str(), token.as_str(), expire)
            .await?;
        debug!(key = %key, acquired, "Lock acquisition attempt");
        Ok(acquired)
    }

    /// Poll for the lock record until it is created or `wait` runs out
    ///
    /// Always attempts at least once, so a zero `wait` is a single
    /// [`acquire`](Self::acquire). The budget is measured against a
    /// deadline, so time spent inside each attempt counts against it; no
    /// attempt is started once the next poll would land past the deadline.
    ///
    /// # Cancellation
    ///
    /// The future can be dropped at any poll. A set command in flight when
    /// it is dropped may still have created the record, so a caller that
    /// abandons the wait should still [`release`](Self::release) with the
    /// same token.
    pub async fn acquire_with_wait<C>(
        &self,
        connection: &mut C,
        key: &LockKey,
        token: &OwnershipToken,
        expire: Duration,
        wait: Duration,
    ) -> Result<bool>
    where
        C: LockConnection + ?Sized,
    {
        expire_to_secs(expire)?;
        let deadline = Instant::now().checked_add(wait);
        let mut attempt: u32 = 0;

        loop {
            attempt = attempt.saturating_add(1);
            if self.acquire(connection, key, token, expire).await? {
                debug!(key = %key, attempt, "Lock acquired while waiting");
                return Ok(true);
            }

            let remaining =
                deadline.map_or(Duration::MAX, |d| d.saturating_duration_since(Instant::now()));
            if remaining <= self.poll_interval {
                debug!(key = %key, attempt, ?wait, "Gave up waiting for lock");
                return Ok(false);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Delete the lock record for `key` if it still holds `token`
    ///
    /// Safe to call when acquisition failed or never happened. `Ok(false)`
    /// means the record had already expired or belongs to another token; it
    /// is logged and left to the caller, never raised.
    pub async fn release<C>(
        &self,
        connection: &mut C,
        key: &LockKey,
        token: &OwnershipToken,
    ) -> Result<bool>
    where
        C: LockConnection + ?Sized,
    {
        let released = connection
            .compare_and_delete(key.as_str(), token.as_str())
            .await?;
        if released {
            debug!(key = %key, "Lock released");
        } else {
            warn!(key = %key, "Lock not released: record expired or owned by another token");
        }
        Ok(released)
    }
}

impl Default for LockCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
