//! In-memory lock store provider
//!
//! A process-local store with the same atomicity and TTL semantics as the
//! Redis provider. Expiry follows `tokio::time`, so tests can drive it with
//! a paused clock. Useful for testing and for single-process deployments.

use async_trait::async_trait;
use dlock_domain::error::{Error, Result};
use dlock_domain::ports::{ConnectionSource, LockConnection};
use dlock_domain::value_objects::expire_to_secs;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug)]
struct Record {
    token: String,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct MemoryState {
    records: HashMap<String, Record>,
    set_attempts: u64,
    unavailable: bool,
}

impl MemoryState {
    fn purge_expired(&mut self, key: &str) {
        let now = Instant::now();
        if self
            .records
            .get(key)
            .is_some_and(|record| record.expires_at <= now)
        {
            self.records.remove(key);
        }
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            Err(Error::store_unavailable("In-memory store is offline"))
        } else {
            Ok(())
        }
    }
}

/// Shared in-memory lock store
///
/// Clones share the same records. Each caller works through its own
/// [`MemoryConnection`].
///
/// # Example
///
/// ```rust
/// use dlock_providers::store::MemoryLockStore;
///
/// let store = MemoryLockStore::new();
/// let connection = store.connect();
/// assert!(store.holder("order:42").is_none());
/// # drop(connection);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryLockStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryLockStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a connection to this store
    pub fn connect(&self) -> MemoryConnection {
        MemoryConnection {
            store: self.clone(),
        }
    }

    /// Token currently holding `key`, if the record is live
    pub fn holder(&self, key: &str) -> Option<String> {
        let mut state = self.lock().ok()?;
        state.purge_expired(key);
        state.records.get(key).map(|record| record.token.clone())
    }

    /// Remaining time-to-live of `key`, if the record is live
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let mut state = self.lock().ok()?;
        state.purge_expired(key);
        state
            .records
            .get(key)
            .map(|record| record.expires_at.saturating_duration_since(Instant::now()))
    }

    /// Number of conditional SET commands received so far
    pub fn set_attempts(&self) -> u64 {
        self.lock().map(|state| state.set_attempts).unwrap_or(0)
    }

    /// Simulate the store going offline or coming back
    pub fn set_unavailable(&self, unavailable: bool) {
        if let Ok(mut state) = self.lock() {
            state.unavailable = unavailable;
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| Error::internal("In-memory lock store mutex poisoned"))
    }
}

/// Connection to a [`MemoryLockStore`]
#[derive(Debug, Clone)]
pub struct MemoryConnection {
    store: MemoryLockStore,
}

impl MemoryConnection {
    /// Store this connection talks to
    pub fn store(&self) -> &MemoryLockStore {
        &self.store
    }
}

#[async_trait]
impl LockConnection for MemoryConnection {
    async fn set_if_absent(&mut self, key: &str, token: &str, ttl: Duration) -> Result<bool> {
        let seconds = expire_to_secs(ttl)?;
        let expires_at = Instant::now()
            .checked_add(Duration::from_secs(seconds))
            .ok_or_else(|| {
                Error::invalid_argument(format!("Lock expiry of {seconds}s is out of range"))
            })?;
        let mut state = self.store.lock()?;
        state.check_available()?;
        state.set_attempts += 1;
        state.purge_expired(key);

        if state.records.contains_key(key) {
            return Ok(false);
        }
        state.records.insert(
            key.to_string(),
            Record {
                token: token.to_string(),
                expires_at,
            },
        );
        Ok(true)
    }

    async fn compare_and_delete(&mut self, key: &str, token: &str) -> Result<bool> {
        let mut state = self.store.lock()?;
        state.check_available()?;
        state.purge_expired(key);

        if state
            .records
            .get(key)
            .is_some_and(|record| record.token == token)
        {
            state.records.remove(key);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn ping(&mut self) -> Result<()> {
        self.store.lock()?.check_available()
    }
}

#[async_trait]
impl ConnectionSource for MemoryLockStore {
    type Connection = MemoryConnection;

    async fn checkout(&self) -> Result<MemoryConnection> {
        self.lock()?.check_available()?;
        Ok(self.connect())
    }

    async fn give_back(&self, _connection: MemoryConnection) {}
}
