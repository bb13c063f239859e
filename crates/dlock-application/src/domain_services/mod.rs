//! Domain services
//!
//! Stateless services implementing the lock protocol against the store port.

pub mod coordinator;

pub use coordinator::LockCoordinator;
