//! Application Layer - dlock
//!
//! The lock protocol itself: atomic acquisition, bounded waiting,
//! ownership-checked release, and guarded execution of an operation
//! between the two.
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `dlock-domain`: value objects, errors and the store ports
//! - tokio for timers and cancellation
//!
//! Store implementations come from `dlock-providers`; pooled connections
//! from `dlock-infrastructure`.

pub mod domain_services;
pub mod use_cases;

pub use domain_services::*;
pub use use_cases::*;
