//! Connection Source Port
//!
//! Where a guarded run obtains its store connection and where it hands the
//! connection back afterwards.

use super::lock::LockConnection;
use crate::error::Result;
use async_trait::async_trait;

/// Hands out lock connections for one store endpoint
#[async_trait]
pub trait ConnectionSource: Send + Sync {
    /// Connection type handed out
    type Connection: LockConnection;

    /// Obtain a usable connection, or `StoreUnavailable`
    async fn checkout(&self) -> Result<Self::Connection>;

    /// Return a connection once the guarded run is over
    async fn give_back(&self, connection: Self::Connection);
}
