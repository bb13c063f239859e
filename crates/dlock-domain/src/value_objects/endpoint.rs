//! Store endpoint value objects

use crate::constants::STORE_DEFAULT_PORT;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Fully resolved connection parameters for one store endpoint
///
/// Resolution of defaults happens in the configuration layer; the pool
/// takes this record as-is.
#[derive(Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Store hostname
    pub host: String,
    /// Store port
    pub port: u16,
    /// Password sent with `AUTH` after connecting
    pub credential: Option<String>,
    /// Maximum number of pooled connections for this endpoint
    pub max_idle: usize,
    /// How long a checkout waits for a free connection
    pub max_wait: Duration,
    /// Timeout for connecting and for each store command
    pub connect_timeout: Duration,
    /// Total checkout attempts before giving up
    pub retry_count: u32,
}

impl EndpointConfig {
    /// Endpoint with pool defaults for the given host and port
    pub fn new<S: Into<String>>(host: S, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            credential: None,
            max_idle: 8,
            max_wait: Duration::from_millis(1000),
            connect_timeout: Duration::from_millis(2000),
            retry_count: 3,
        }
    }

    /// Set the credential
    pub fn with_credential<S: Into<String>>(mut self, credential: S) -> Self {
        self.credential = Some(credential.into());
        self
    }

    /// Set the maximum pool size
    pub fn with_max_idle(mut self, max_idle: usize) -> Self {
        self.max_idle = max_idle;
        self
    }

    /// Set the checkout wait timeout
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Set the connect and command timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the number of checkout attempts
    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    /// Identity under which this endpoint's pool is registered
    pub fn identity(&self) -> EndpointIdentity {
        EndpointIdentity {
            host: self.host.clone(),
            port: self.port,
            credential: self.credential.clone(),
        }
    }

    /// Checkout attempts, never less than one
    pub fn attempts(&self) -> u32 {
        self.retry_count.max(1)
    }

    /// Reject parameters no pool can be built from
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::configuration("Store host cannot be empty"));
        }
        if self.port == 0 {
            return Err(Error::configuration("Store port cannot be 0"));
        }
        if self.max_idle == 0 {
            return Err(Error::configuration("Store max_idle cannot be 0"));
        }
        Ok(())
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", STORE_DEFAULT_PORT)
    }
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("credential", &self.credential.as_ref().map(|_| "***"))
            .field("max_idle", &self.max_idle)
            .field("max_wait", &self.max_wait)
            .field("connect_timeout", &self.connect_timeout)
            .field("retry_count", &self.retry_count)
            .finish()
    }
}

/// Key of the process-wide pool registry: host, port and credential
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EndpointIdentity {
    host: String,
    port: u16,
    credential: Option<String>,
}

impl fmt::Display for EndpointIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for EndpointIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointIdentity")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("credential", &self.credential.as_ref().map(|_| "***"))
            .finish()
    }
}
