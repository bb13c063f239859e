//! Guarded execution
//!
//! Runs an operation while holding a lock: checkout a connection, generate
//! a fresh ownership token, acquire, run, then release and hand the
//! connection back. The release runs on every exit path of the operation,
//! including failure and panic.
//!
//! ## Example
//!
//! ```ignore
//! use dlock_application::use_cases::GuardInvoker;
//! use dlock_domain::{LockKey, LockOptions, LockOutcome};
//!
//! let invoker = GuardInvoker::new(source);
//! let key = LockKey::new("order:42")?;
//! match invoker.run(&key, LockOptions::default(), || async { ship_order(42).await }).await? {
//!     LockOutcome::Acquired(shipped) => shipped?,
//!     LockOutcome::Contended => return Err(OrderError::Busy),
//! }
//! ```

use crate::domain_services::LockCoordinator;
use dlock_domain::error::{Error, Result};
use dlock_domain::ports::{ConnectionSource, LockConnection};
use dlock_domain::value_objects::{LockKey, LockOptions, LockOutcome, OwnershipToken};
use futures::FutureExt;
use std::future::Future;
use std::panic::{AssertUnwindSafe, resume_unwind};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How the acquisition phase ended
enum Acquisition {
    Held,
    Contended,
    Cancelled,
    Failed(Error),
}

/// Run `op` under the lock for `key` on an already checked-out connection
///
/// `cancel` is only observed while acquiring. If it fires, the run still
/// releases with its token (a set in flight may have landed) and returns
/// [`Error::Cancelled`]. Store failures during acquisition are returned as
/// errors, never as [`LockOutcome::Contended`].
pub async fn run_with_lock<C, F, Fut, T>(
    coordinator: &LockCoordinator,
    connection: &mut C,
    key: &LockKey,
    options: LockOptions,
    cancel: &CancellationToken,
    op: F,
) -> Result<LockOutcome<T>>
where
    C: LockConnection + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    let token = OwnershipToken::generate();

    let acquisition = tokio::select! {
        biased;
        () = cancel.cancelled() => Acquisition::Cancelled,
        result = acquire(coordinator, connection, key, &token, options) => match result {
            Ok(true) => Acquisition::Held,
            Ok(false) => Acquisition::Contended,
            Err(e) => Acquisition::Failed(e),
        },
    };

    let (outcome, held) = match acquisition {
        Acquisition::Held => {
            debug!(key = %key, "Running guarded operation");
            let ran = AssertUnwindSafe(async { op().await }).catch_unwind().await;
            match ran {
                Ok(value) => (Ok(LockOutcome::Acquired(value)), true),
                Err(panic) => {
                    cleanup(coordinator, connection, key, &token, true).await;
                    resume_unwind(panic);
                }
            }
        }
        Acquisition::Contended => {
            info!(key = %key, "Lock not acquired: held by another owner");
            (Ok(LockOutcome::Contended), false)
        }
        Acquisition::Cancelled => (
            Err(Error::cancelled(format!("Acquisition of lock {key} abandoned"))),
            false,
        ),
        Acquisition::Failed(e) => (Err(e), false),
    };

    cleanup(coordinator, connection, key, &token, held).await;
    outcome
}

async fn acquire<C>(
    coordinator: &LockCoordinator,
    connection: &mut C,
    key: &LockKey,
    token: &OwnershipToken,
    options: LockOptions,
) -> Result<bool>
where
    C: LockConnection + ?Sized,
{
    match options.wait {
        Some(wait) => {
            coordinator
                .acquire_with_wait(connection, key, token, options.expire, wait)
                .await
        }
        None => coordinator.acquire(connection, key, token, options.expire).await,
    }
}

/// Release with `token`; failures here never override the run's outcome
async fn cleanup<C>(
    coordinator: &LockCoordinator,
    connection: &mut C,
    key: &LockKey,
    token: &OwnershipToken,
    held: bool,
) where
    C: LockConnection + ?Sized,
{
    let released = if held {
        coordinator.release(connection, key, token).await
    } else {
        connection
            .compare_and_delete(key.as_str(), token.as_str())
            .await
    };

    match released {
        Ok(true) if !held => {
            debug!(key = %key, "Released a lock set by an interrupted acquisition");
        }
        Ok(_) => {}
        Err(e) => warn!(key = %key, error = %e, "Lock release failed; record will expire by TTL"),
    }
}

/// Runs operations under locks obtained from a [`ConnectionSource`]
///
/// The explicit counterpart of wrapping a method with an interceptor: the
/// guarded operation is passed in as a closure.
#[derive(Debug, Clone)]
pub struct GuardInvoker<S> {
    source: S,
    coordinator: LockCoordinator,
}

impl<S: ConnectionSource> GuardInvoker<S> {
    /// Create an invoker drawing connections from `source`
    pub fn new(source: S) -> Self {
        Self {
            source,
            coordinator: LockCoordinator::new(),
        }
    }

    /// Use a specific coordinator (e.g. a different poll interval)
    pub fn with_coordinator(mut self, coordinator: LockCoordinator) -> Self {
        self.coordinator = coordinator;
        self
    }

    /// Connection source backing this invoker
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run `op` while holding the lock for `key`
    ///
    /// Returns [`LockOutcome::Contended`] when another owner holds the lock
    /// for the whole attempt, and `Err(StoreUnavailable)` when no
    /// connection could be obtained or a store command failed.
    pub async fn run<F, Fut, T>(
        &self,
        key: &LockKey,
        options: LockOptions,
        op: F,
    ) -> Result<LockOutcome<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.run_cancellable(key, options, &CancellationToken::new(), op)
            .await
    }

    /// Like [`run`](Self::run), but the wait for the lock can be abandoned
    /// through `cancel`
    pub async fn run_cancellable<F, Fut, T>(
        &self,
        key: &LockKey,
        options: LockOptions,
        cancel: &CancellationToken,
        op: F,
    ) -> Result<LockOutcome<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut connection = self.source.checkout().await?;
        let ran = AssertUnwindSafe(run_with_lock(
            &self.coordinator,
            &mut connection,
            key,
            options,
            cancel,
            op,
        ))
        .catch_unwind()
        .await;
        self.source.give_back(connection).await;

        match ran {
            Ok(outcome) => outcome,
            Err(panic) => resume_unwind(panic),
        }
    }

    /// Run `op` under the lock on a connection the caller already holds
    ///
    /// The connection is neither checked out nor given back.
    pub async fn with_connection<C, F, Fut, T>(
        &self,
        connection: &mut C,
        key: &LockKey,
        options: LockOptions,
        op: F,
    ) -> Result<LockOutcome<T>>
    where
        C: LockConnection + ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        run_with_lock(
            &self.coordinator,
            connection,
            key,
            options,
            &CancellationToken::new(),
            op,
        )
        .await
    }
}
