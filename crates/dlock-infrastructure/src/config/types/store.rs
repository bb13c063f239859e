//! Store endpoint configuration types

use crate::constants::STORE_DEFAULT_HOST;
use dlock_domain::constants::STORE_DEFAULT_PORT;
use dlock_domain::value_objects::EndpointConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Store endpoint and connection pool configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store hostname
    pub host: String,

    /// Store port
    pub port: u16,

    /// Password sent with `AUTH`, if the store requires one
    pub password: Option<String>,

    /// Maximum pooled connections for the endpoint
    pub max_idle: usize,

    /// Checkout wait timeout in milliseconds
    pub max_wait_ms: u64,

    /// Connect and command timeout in milliseconds
    pub connect_timeout_ms: u64,

    /// Total checkout attempts
    pub retry_count: u32,
}

impl StoreConfig {
    /// Resolve into the endpoint record handed to the pool
    pub fn to_endpoint(&self) -> EndpointConfig {
        let mut endpoint = EndpointConfig::new(self.host.clone(), self.port)
            .with_max_idle(self.max_idle)
            .with_max_wait(Duration::from_millis(self.max_wait_ms))
            .with_connect_timeout(Duration::from_millis(self.connect_timeout_ms))
            .with_retry_count(self.retry_count);
        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            endpoint = endpoint.with_credential(password);
        }
        endpoint
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        let endpoint = EndpointConfig::new(STORE_DEFAULT_HOST, STORE_DEFAULT_PORT);
        Self {
            host: endpoint.host,
            port: endpoint.port,
            password: None,
            max_idle: endpoint.max_idle,
            max_wait_ms: endpoint.max_wait.as_millis() as u64,
            connect_timeout_ms: endpoint.connect_timeout.as_millis() as u64,
            retry_count: endpoint.retry_count,
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("max_idle", &self.max_idle)
            .field("max_wait_ms", &self.max_wait_ms)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("retry_count", &self.retry_count)
            .finish()
    }
}
