//! Checked-out pool connection

use super::registry::EndpointPool;
use async_trait::async_trait;
use deadpool::managed::Object;
use dlock_domain::error::Result;
use dlock_domain::ports::LockConnection;
use dlock_domain::value_objects::EndpointIdentity;
use dlock_providers::store::RedisConnectionManager;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A Redis connection checked out from an endpoint pool
///
/// Dropping it returns the connection to its pool unchecked; prefer
/// [`StoreConnectionPool::give_back`](super::StoreConnectionPool::give_back),
/// which probes it first and discards it if broken.
pub struct PooledConnection {
    pub(super) object: Object<RedisConnectionManager>,
    pub(super) pool: Arc<EndpointPool>,
}

impl PooledConnection {
    /// Endpoint this connection belongs to
    pub fn endpoint(&self) -> &EndpointIdentity {
        self.pool.identity()
    }
}

#[async_trait]
impl LockConnection for PooledConnection {
    async fn set_if_absent(&mut self, key: &str, token: &str, ttl: Duration) -> Result<bool> {
        self.object.set_if_absent(key, token, ttl).await
    }

    async fn compare_and_delete(&mut self, key: &str, token: &str) -> Result<bool> {
        self.object.compare_and_delete(key, token).await
    }

    async fn ping(&mut self) -> Result<()> {
        self.object.ping().await
    }
}

impl fmt::Debug for PooledConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledConnection")
            .field("endpoint", self.pool.identity())
            .finish_non_exhaustive()
    }
}
