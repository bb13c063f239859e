//! Per-endpoint pool registry

use super::connection::PooledConnection;
use crate::error_ext::ErrorContext;
use async_trait::async_trait;
use dashmap::DashMap;
use deadpool::Runtime;
use deadpool::managed::{Object, Pool};
use dlock_domain::error::{Error, Result};
use dlock_domain::ports::{ConnectionSource, LockConnection};
use dlock_domain::value_objects::{EndpointConfig, EndpointIdentity};
use dlock_providers::store::RedisConnectionManager;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, warn};

static GLOBAL: LazyLock<StoreConnectionPool> = LazyLock::new(StoreConnectionPool::new);

/// Snapshot of one endpoint pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Successful checkouts
    pub checkouts: u64,
    /// Failed checkout attempts
    pub failed_attempts: u64,
    /// Connections dropped after a failed probe on give-back
    pub discarded: u64,
    /// Connections currently owned by the pool
    pub size: usize,
    /// Idle connections ready to be handed out
    pub available: usize,
    /// Maximum pool size
    pub max_size: usize,
}

/// The pool of one endpoint and its counters
pub struct EndpointPool {
    identity: EndpointIdentity,
    pool: Pool<RedisConnectionManager>,
    attempts: u32,
    checkouts: AtomicU64,
    failed_attempts: AtomicU64,
    discarded: AtomicU64,
}

impl EndpointPool {
    fn build(endpoint: &EndpointConfig) -> Result<Self> {
        let manager = RedisConnectionManager::new(endpoint.clone())?;
        let pool = Pool::builder(manager)
            .max_size(endpoint.max_idle)
            .wait_timeout(Some(endpoint.max_wait))
            .create_timeout(Some(endpoint.connect_timeout))
            .recycle_timeout(Some(endpoint.connect_timeout))
            .runtime(Runtime::Tokio1)
            .build()
            .config_context(format!("Failed to build pool for {}", endpoint.identity()))?;

        info!(
            endpoint = %endpoint.identity(),
            max_size = endpoint.max_idle,
            "Created store connection pool"
        );
        Ok(Self {
            identity: endpoint.identity(),
            pool,
            attempts: endpoint.attempts(),
            checkouts: AtomicU64::new(0),
            failed_attempts: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
        })
    }

    /// Endpoint identity this pool is registered under
    pub fn identity(&self) -> &EndpointIdentity {
        &self.identity
    }

    /// Current counters and pool status
    pub fn stats(&self) -> PoolStats {
        let status = self.pool.status();
        PoolStats {
            checkouts: self.checkouts.load(Ordering::Relaxed),
            failed_attempts: self.failed_attempts.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            size: status.size,
            available: status.available,
            max_size: status.max_size,
        }
    }

    async fn checkout(self: &Arc<Self>) -> Result<PooledConnection> {
        let mut last_error = None;

        for attempt in 1..=self.attempts {
            match self.pool.get().await {
                Ok(object) => {
                    self.checkouts.fetch_add(1, Ordering::Relaxed);
                    debug!(endpoint = %self.identity, attempt, "Checked out store connection");
                    return Ok(PooledConnection {
                        object,
                        pool: Arc::clone(self),
                    });
                }
                Err(e) => {
                    self.failed_attempts.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        endpoint = %self.identity,
                        attempt,
                        max_attempts = self.attempts,
                        error = %e,
                        "Store connection checkout failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        let message = format!(
            "No connection to {} after {} attempts",
            self.identity, self.attempts
        );
        match last_error {
            Some(e) => Err::<PooledConnection, _>(e).store_context(message),
            None => Err(Error::store_unavailable(message)),
        }
    }
}

impl std::fmt::Debug for EndpointPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointPool")
            .field("identity", &self.identity)
            .field("attempts", &self.attempts)
            .field("stats", &self.stats())
            .finish()
    }
}

/// Registry of connection pools, one per endpoint identity
///
/// Clones share the same registry. Pools are created on first use and never
/// torn down; the first configuration seen for an identity sizes its pool.
///
/// # Example
///
/// ```ignore
/// use dlock_domain::EndpointConfig;
/// use dlock_infrastructure::StoreConnectionPool;
///
/// let endpoint = EndpointConfig::new("localhost", 6379);
/// let mut connection = StoreConnectionPool::global().checkout(&endpoint).await?;
/// // ... acquire / release on `connection` ...
/// StoreConnectionPool::global().give_back(connection).await;
/// ```
#[derive(Debug, Clone, Default)]
pub struct StoreConnectionPool {
    registry: Arc<DashMap<EndpointIdentity, Arc<EndpointPool>>>,
}

impl StoreConnectionPool {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry
    pub fn global() -> &'static StoreConnectionPool {
        &GLOBAL
    }

    /// Pool for `endpoint`, creating it if this identity is new
    ///
    /// Concurrent first calls for one identity create exactly one pool.
    pub fn provision(&self, endpoint: &EndpointConfig) -> Result<Arc<EndpointPool>> {
        endpoint.validate()?;
        let identity = endpoint.identity();

        if let Some(existing) = self.registry.get(&identity) {
            return Ok(Arc::clone(existing.value()));
        }
        let entry = self
            .registry
            .entry(identity)
            .or_try_insert_with(|| EndpointPool::build(endpoint).map(Arc::new))?;
        Ok(Arc::clone(entry.value()))
    }

    /// Obtain a connection for `endpoint`
    ///
    /// Makes up to `retry_count` attempts (at least one), each bounded by
    /// the pool's wait timeout, then fails with `StoreUnavailable`.
    pub async fn checkout(&self, endpoint: &EndpointConfig) -> Result<PooledConnection> {
        let pool = self.provision(endpoint)?;
        pool.checkout().await
    }

    /// Return a connection to its pool
    ///
    /// A connection that fails its `PING` is detached and dropped instead.
    pub async fn give_back(&self, mut connection: PooledConnection) {
        match connection.ping().await {
            Ok(()) => drop(connection),
            Err(e) => {
                let PooledConnection { object, pool } = connection;
                pool.discarded.fetch_add(1, Ordering::Relaxed);
                warn!(endpoint = %pool.identity, error = %e, "Discarding broken store connection");
                drop(Object::take(object));
            }
        }
    }

    /// Counters for `endpoint`, if its pool exists
    pub fn stats(&self, endpoint: &EndpointConfig) -> Option<PoolStats> {
        self.registry
            .get(&endpoint.identity())
            .map(|pool| pool.stats())
    }

    /// Number of endpoint pools created so far
    pub fn endpoint_count(&self) -> usize {
        self.registry.len()
    }

    /// Connection source for one endpoint backed by this registry
    pub fn for_endpoint(&self, endpoint: EndpointConfig) -> EndpointSource {
        EndpointSource {
            pools: self.clone(),
            endpoint,
        }
    }
}

/// [`ConnectionSource`] drawing from the pool of one endpoint
#[derive(Debug, Clone)]
pub struct EndpointSource {
    pools: StoreConnectionPool,
    endpoint: EndpointConfig,
}

impl EndpointSource {
    /// Endpoint served by this source
    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }
}

#[async_trait]
impl ConnectionSource for EndpointSource {
    type Connection = PooledConnection;

    async fn checkout(&self) -> Result<PooledConnection> {
        self.pools.checkout(&self.endpoint).await
    }

    async fn give_back(&self, connection: PooledConnection) {
        self.pools.give_back(connection).await;
    }
}
