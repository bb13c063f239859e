//! # dlock Domain Layer
//!
//! Value objects, the store port and the error type shared by every
//! dlock crate.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`constants`] | Lock protocol constants |
//! | [`error`] | Error and result types |
//! | [`ports`] | Store and connection-source ports |
//! | [`value_objects`] | Lock keys, tokens, options and endpoints |

pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
pub use ports::{ConnectionSource, LockConnection};
pub use value_objects::{
    EndpointConfig, EndpointIdentity, LockKey, LockOptions, LockOutcome, OwnershipToken,
};
