//! Lock value objects

use crate::constants::{LOCK_DEFAULT_EXPIRE_SECS, LOCK_MAX_EXPIRE_SECS};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Name of a protected resource in the shared store namespace
///
/// Every competing caller must agree on the same key. Empty and
/// whitespace-only keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LockKey(String);

impl LockKey {
    /// Create a lock key, rejecting blank names
    pub fn new<S: Into<String>>(key: S) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(Error::invalid_argument("Lock key cannot be empty"));
        }
        Ok(Self(key))
    }

    /// Key as stored
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LockKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for LockKey {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<LockKey> for String {
    fn from(key: LockKey) -> Self {
        key.0
    }
}

impl AsRef<str> for LockKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Proof of which acquisition attempt holds a lock
///
/// Generated fresh for every attempt. Only the holder of the token that
/// created a lock record can release it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnershipToken(String);

impl OwnershipToken {
    /// Generate a new random token
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Token as stored in the lock record
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for OwnershipToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for OwnershipToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for OwnershipToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Timing parameters of a guarded run
///
/// `expire` bounds how long a record survives without release. `wait`
/// bounds how long a caller contends before giving up; `None` means a
/// single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockOptions {
    /// Lock record time-to-live
    pub expire: Duration,
    /// Maximum time to keep polling for a held lock
    pub wait: Option<Duration>,
}

impl LockOptions {
    /// Options with the given expiry and no waiting
    pub fn new(expire: Duration) -> Self {
        Self { expire, wait: None }
    }

    /// Set the expiry
    pub fn with_expire(mut self, expire: Duration) -> Self {
        self.expire = expire;
        self
    }

    /// Set the wait budget
    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = Some(wait);
        self
    }

    /// Expiry in whole seconds, as sent with `SET .. EX`
    ///
    /// Sub-second remainders are truncated. A result of zero is rejected
    /// because the store would refuse an `EX 0`, and so is anything above
    /// [`LOCK_MAX_EXPIRE_SECS`].
    pub fn expire_secs(&self) -> Result<u64> {
        expire_to_secs(self.expire)
    }
}

impl Default for LockOptions {
    fn default() -> Self {
        Self::new(Duration::from_secs(LOCK_DEFAULT_EXPIRE_SECS))
    }
}

/// Convert a lock expiry to whole seconds
///
/// Rejects anything under one second or above [`LOCK_MAX_EXPIRE_SECS`].
pub fn expire_to_secs(expire: Duration) -> Result<u64> {
    match expire.as_secs() {
        0 => Err(Error::invalid_argument(format!(
            "Lock expiry must be at least one second, got {expire:?}"
        ))),
        secs if secs > LOCK_MAX_EXPIRE_SECS => Err(Error::invalid_argument(format!(
            "Lock expiry must be at most {LOCK_MAX_EXPIRE_SECS} seconds, got {secs}"
        ))),
        secs => Ok(secs),
    }
}

/// Outcome of running an operation under a lock
///
/// Store failures are reported through `Err`, never as `Contended`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockOutcome<T> {
    /// The lock was acquired and the operation produced this value
    Acquired(T),
    /// Another holder owned the lock for the whole attempt
    Contended,
}

impl<T> LockOutcome<T> {
    /// Whether the operation ran
    pub fn is_acquired(&self) -> bool {
        matches!(self, Self::Acquired(_))
    }

    /// Value produced by the operation, if it ran
    pub fn into_acquired(self) -> Option<T> {
        match self {
            Self::Acquired(value) => Some(value),
            Self::Contended => None,
        }
    }

    /// Transform the value produced by the operation
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> LockOutcome<U> {
        match self {
            Self::Acquired(value) => LockOutcome::Acquired(f(value)),
            Self::Contended => LockOutcome::Contended,
        }
    }
}
