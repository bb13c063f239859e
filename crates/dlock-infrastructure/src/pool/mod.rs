//! Store connection pools
//!
//! One deadpool pool per store endpoint, created lazily on first use and
//! kept for the lifetime of the process. Connections are `PING`ed before
//! being handed out again and when they are given back.
//!
//! | Type | Role |
//! |------|------|
//! | [`StoreConnectionPool`] | registry keyed by endpoint identity |
//! | [`EndpointPool`] | the pool and counters of one endpoint |
//! | [`PooledConnection`] | checked-out connection, returns itself on drop |
//! | [`EndpointSource`] | `ConnectionSource` bound to one endpoint |

mod connection;
mod registry;

pub use connection::PooledConnection;
pub use registry::{EndpointPool, EndpointSource, PoolStats, StoreConnectionPool};
