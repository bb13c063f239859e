//! Redis lock store provider
//!
//! Lock connections backed by Redis. Exactly three command shapes reach the
//! server once a connection is up:
//!
//! - `SET key token NX EX seconds` to acquire,
//! - the compare-and-delete Lua script to release,
//! - `PING` to probe liveness.
//!
//! `AUTH` is sent once right after connecting when a credential is set.
//!
//! ## Example
//!
//! ```ignore
//! use dlock_providers::store::RedisConnectionManager;
//! use dlock_domain::EndpointConfig;
//!
//! let manager = RedisConnectionManager::new(EndpointConfig::new("localhost", 6379))?;
//! let pool = deadpool::managed::Pool::builder(manager).build()?;
//! ```

use async_trait::async_trait;
use deadpool::managed::{self, Metrics, RecycleError, RecycleResult};
use dlock_domain::constants::{RELEASE_SCRIPT, STORE_OK_REPLY, STORE_PONG_REPLY};
use dlock_domain::error::{Error, Result};
use dlock_domain::ports::LockConnection;
use dlock_domain::value_objects::{EndpointConfig, expire_to_secs};
use redis::aio::MultiplexedConnection;
use redis::{Client, RedisError, RedisResult, Script};
use std::fmt;
use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

static RELEASE: LazyLock<Script> = LazyLock::new(|| Script::new(RELEASE_SCRIPT));

/// Bound a Redis call by `timeout`
///
/// Network failures and timeouts are `StoreUnavailable`; anything the server
/// rejected is `Internal`.
async fn bounded<T>(
    timeout: Duration,
    command: &str,
    call: impl Future<Output = RedisResult<T>>,
) -> Result<T> {
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(classify(command, e)),
        Err(_) => Err(Error::store_unavailable(format!(
            "Redis {command} timed out after {timeout:?}"
        ))),
    }
}

fn classify(command: &str, e: RedisError) -> Error {
    let message = format!("Redis {command} failed: {e}");
    if e.is_io_error() || e.is_timeout() || e.is_connection_dropped() || e.is_connection_refusal()
    {
        Error::store_unavailable_with_source(message, e)
    } else {
        Error::internal(message)
    }
}

/// A single Redis connection holding lock records
pub struct RedisConnection {
    inner: MultiplexedConnection,
    command_timeout: Duration,
}

impl RedisConnection {
    /// Connect to `endpoint` and authenticate if it carries a credential
    pub async fn connect(client: &Client, endpoint: &EndpointConfig) -> Result<Self> {
        let timeout = endpoint.connect_timeout;
        let inner = bounded(timeout, "CONNECT", client.get_multiplexed_async_connection()).await?;

        let mut connection = Self {
            inner,
            command_timeout: timeout,
        };
        if let Some(credential) = &endpoint.credential {
            connection.authenticate(credential).await?;
        }

        debug!(endpoint = %endpoint.identity(), "Redis connection established");
        Ok(connection)
    }

    async fn authenticate(&mut self, credential: &str) -> Result<()> {
        let mut cmd = redis::cmd("AUTH");
        cmd.arg(credential);
        let reply: String = bounded(self.command_timeout, "AUTH", cmd.query_async(&mut self.inner))
            .await
            .map_err(|e| match e {
                Error::Internal { message } => {
                    Error::store_unavailable(format!("Redis AUTH rejected: {message}"))
                }
                other => other,
            })?;
        if reply == STORE_OK_REPLY {
            Ok(())
        } else {
            Err(Error::store_unavailable(format!(
                "Redis AUTH rejected: {reply}"
            )))
        }
    }
}

#[async_trait]
impl LockConnection for RedisConnection {
    async fn set_if_absent(&mut self, key: &str, token: &str, ttl: Duration) -> Result<bool> {
        let seconds = expire_to_secs(ttl)?;

        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(token).arg("NX").arg("EX").arg(seconds);
        let reply: Option<String> =
            bounded(self.command_timeout, "SET NX EX", cmd.query_async(&mut self.inner)).await?;

        Ok(reply.as_deref() == Some(STORE_OK_REPLY))
    }

    async fn compare_and_delete(&mut self, key: &str, token: &str) -> Result<bool> {
        let mut invocation = RELEASE.key(key);
        invocation.arg(token);
        let deleted: i64 = bounded(
            self.command_timeout,
            "compare-and-delete",
            invocation.invoke_async(&mut self.inner),
        )
        .await?;

        Ok(deleted == 1)
    }

    async fn ping(&mut self) -> Result<()> {
        let cmd = redis::cmd("PING");
        let reply: String =
            bounded(self.command_timeout, "PING", cmd.query_async(&mut self.inner)).await?;
        if reply == STORE_PONG_REPLY {
            Ok(())
        } else {
            Err(Error::store_unavailable(format!(
                "Unexpected PING reply: {reply}"
            )))
        }
    }
}

impl fmt::Debug for RedisConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisConnection")
            .field("command_timeout", &self.command_timeout)
            .finish_non_exhaustive()
    }
}

/// Creates and validates [`RedisConnection`]s for one endpoint
///
/// Pooled connections are probed with `PING` every time they are handed
/// out again; a failed probe discards the connection.
pub struct RedisConnectionManager {
    client: Client,
    endpoint: EndpointConfig,
}

impl RedisConnectionManager {
    /// Create a manager for the given endpoint
    ///
    /// No connection is made until the pool asks for one.
    pub fn new(endpoint: EndpointConfig) -> Result<Self> {
        let client = Client::open((endpoint.host.as_str(), endpoint.port)).map_err(|e| {
            Error::configuration_with_source(
                format!("Invalid Redis endpoint {}: {e}", endpoint.identity()),
                e,
            )
        })?;

        Ok(Self { client, endpoint })
    }

    /// Endpoint served by this manager
    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }
}

impl managed::Manager for RedisConnectionManager {
    type Type = RedisConnection;
    type Error = Error;

    async fn create(&self) -> Result<RedisConnection> {
        RedisConnection::connect(&self.client, &self.endpoint).await
    }

    async fn recycle(
        &self,
        connection: &mut RedisConnection,
        _metrics: &Metrics,
    ) -> RecycleResult<Error> {
        connection.ping().await.map_err(RecycleError::Backend)
    }
}

impl fmt::Debug for RedisConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisConnectionManager")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
