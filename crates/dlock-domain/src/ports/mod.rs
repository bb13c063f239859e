//! Domain Port Interfaces
//!
//! Contracts between the lock protocol and the store that arbitrates it.
//! Providers implement them; the application layer depends only on them.
//!
//! | Port | Description |
//! |------|-------------|
//! | [`LockConnection`] | The three store primitives: conditional set, compare-and-delete, ping |
//! | [`ConnectionSource`] | Checkout and return of lock connections |

/// Lock store port
pub mod lock;
/// Connection source port
pub mod source;

pub use lock::LockConnection;
pub use source::ConnectionSource;
