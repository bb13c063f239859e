//! Use cases
//!
//! | Use case | Description |
//! |----------|-------------|
//! | [`GuardInvoker`] | Run an operation while holding a lock |

pub mod guard;

pub use guard::{GuardInvoker, run_with_lock};
