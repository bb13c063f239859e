//! Top-level application configuration

use super::{LockConfig, LoggingConfig, StoreConfig};
use serde::{Deserialize, Serialize};

/// Complete dlock configuration
///
/// ```toml
/// [store]
/// host = "redis.internal"
/// port = 6379
/// retry_count = 3
///
/// [lock]
/// expire_secs = 5
/// wait_ms = 2000
///
/// [logging]
/// level = "info"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Store endpoint and pool settings
    pub store: StoreConfig,

    /// Default lock parameters
    pub lock: LockConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}
