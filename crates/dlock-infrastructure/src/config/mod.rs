//! Configuration
//!
//! `AppConfig` is assembled by [`ConfigLoader`] from defaults, a TOML file
//! and `DLOCK_`-prefixed environment variables, in that order.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::*;
