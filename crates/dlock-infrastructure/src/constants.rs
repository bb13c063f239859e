//! Infrastructure layer constants
//!
//! Lock protocol constants live in `dlock_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "dlock.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "dlock";

/// Environment variable prefix for configuration overrides
pub const CONFIG_ENV_PREFIX: &str = "DLOCK";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// STORE CONSTANTS
// ============================================================================

/// Default store host
pub const STORE_DEFAULT_HOST: &str = "127.0.0.1";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the configured log filter
pub const LOG_FILTER_ENV: &str = "DLOCK_LOG";

/// File name stem used when the log file path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "dlock";
