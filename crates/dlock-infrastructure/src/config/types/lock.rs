//! Lock default configuration types

use dlock_domain::constants::LOCK_DEFAULT_EXPIRE_SECS;
use dlock_domain::value_objects::LockOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default lock parameters applied when a caller does not pass its own
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Lock expiry in seconds
    pub expire_secs: u64,

    /// Wait budget in milliseconds; absent means a single attempt
    pub wait_ms: Option<u64>,
}

impl LockConfig {
    /// Resolve into lock options
    pub fn to_options(&self) -> LockOptions {
        let options = LockOptions::default().with_expire(Duration::from_secs(self.expire_secs));
        match self.wait_ms {
            Some(wait_ms) => options.with_wait(Duration::from_millis(wait_ms)),
            None => options,
        }
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            expire_secs: LOCK_DEFAULT_EXPIRE_SECS,
            wait_ms: None,
        }
    }
}
