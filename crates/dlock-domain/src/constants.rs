//! Domain layer constants
//!
//! Lock protocol constants shared by the application and infrastructure
//! layers. Pool and configuration defaults live in
//! `dlock_infrastructure::constants`.

use std::time::Duration;

// ============================================================================
// LOCK PROTOCOL CONSTANTS
// ============================================================================

/// Delay between acquisition attempts while waiting for a held lock
pub const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default lock expiry in seconds
pub const LOCK_DEFAULT_EXPIRE_SECS: u64 = 5;

/// Longest accepted lock expiry in seconds
///
/// The store converts `EX` to milliseconds and adds the current time, so the
/// bound stays far below `i64::MAX / 1000`.
pub const LOCK_MAX_EXPIRE_SECS: u64 = u32::MAX as u64;

/// Reply to a successful conditional SET
pub const STORE_OK_REPLY: &str = "OK";

/// Reply to a successful PING
pub const STORE_PONG_REPLY: &str = "PONG";

/// Compare-and-delete script: deletes `KEYS[1]` only when it holds `ARGV[1]`
pub const RELEASE_SCRIPT: &str = r#"
if redis.call("get", KEYS[1]) == ARGV[1] then
    return redis.call("del", KEYS[1])
else
    return 0
end
"#;

// ============================================================================
// STORE ENDPOINT CONSTANTS
// ============================================================================

/// Default store port
pub const STORE_DEFAULT_PORT: u16 = 6379;
