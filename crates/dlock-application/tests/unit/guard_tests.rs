//! Guarded execution tests against the in-memory store

use async_trait::async_trait;
use dlock_application::{GuardInvoker, LockCoordinator, run_with_lock};
use dlock_domain::{
    ConnectionSource, Error, LockKey, LockOptions, LockOutcome, OwnershipToken, Result,
};
use dlock_providers::store::{MemoryConnection, MemoryLockStore};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Memory store source that counts returned connections
#[derive(Debug, Clone, Default)]
struct CountingSource {
    store: MemoryLockStore,
    returned: Arc<AtomicUsize>,
}

impl CountingSource {
    fn returned(&self) -> usize {
        self.returned.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectionSource for CountingSource {
    type Connection = MemoryConnection;

    async fn checkout(&self) -> Result<MemoryConnection> {
        self.store.checkout().await
    }

    async fn give_back(&self, _connection: MemoryConnection) {
        self.returned.fetch_add(1, Ordering::SeqCst);
    }
}

fn key(name: &str) -> LockKey {
    LockKey::new(name).unwrap()
}

#[tokio::test]
async fn test_operation_runs_while_lock_is_held() {
    let source = CountingSource::default();
    let store = source.store.clone();
    let invoker = GuardInvoker::new(source.clone());

    let outcome = invoker
        .run(&key("order:42"), LockOptions::default(), || async {
            store.holder("order:42")
        })
        .await
        .unwrap();

    let holder = outcome.into_acquired().unwrap();
    assert!(holder.is_some());
    assert!(source.store.holder("order:42").is_none());
    assert_eq!(source.returned(), 1);
}

#[tokio::test]
async fn test_operation_error_still_releases() {
    let source = CountingSource::default();
    let invoker = GuardInvoker::new(source.clone());

    let outcome = invoker
        .run(&key("k"), LockOptions::default(), || async {
            Err::<(), _>("shipping failed")
        })
        .await
        .unwrap();

    assert!(matches!(outcome, LockOutcome::Acquired(Err("shipping failed"))));
    assert!(source.store.holder("k").is_none());
    assert_eq!(source.returned(), 1);
}

#[tokio::test]
async fn test_contended_lock_skips_operation() {
    let source = CountingSource::default();
    let mut holder = source.store.connect();
    let holder_token = OwnershipToken::from("holder");
    LockCoordinator::new()
        .acquire(&mut holder, &key("k"), &holder_token, Duration::from_secs(5))
        .await
        .unwrap();

    let ran = AtomicUsize::new(0);
    let outcome = GuardInvoker::new(source.clone())
        .run(&key("k"), LockOptions::default(), || async {
            ran.fetch_add(1, Ordering::SeqCst);
        })
        .await
        .unwrap();

    assert!(matches!(outcome, LockOutcome::Contended));
    assert_eq!(ran.load(Ordering::SeqCst), 0);
    assert_eq!(source.store.holder("k").as_deref(), Some("holder"));
    assert_eq!(source.returned(), 1);
}

#[tokio::test]
async fn test_unavailable_store_is_an_error_not_contention() {
    let source = CountingSource::default();
    source.store.set_unavailable(true);

    let result = GuardInvoker::new(source.clone())
        .run(&key("k"), LockOptions::default(), || async { 1 })
        .await;

    assert!(result.unwrap_err().is_store_unavailable());
    assert_eq!(source.returned(), 0);
}

#[tokio::test]
async fn test_invalid_expiry_is_rejected() {
    let source = CountingSource::default();
    let options = LockOptions::default().with_expire(Duration::from_millis(500));

    let result = GuardInvoker::new(source.clone())
        .run(&key("k"), options, || async { 1 })
        .await;

    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    assert_eq!(source.store.set_attempts(), 0);
    assert_eq!(source.returned(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_waiting_run_acquires_after_release() {
    let source = CountingSource::default();
    let coordinator = LockCoordinator::new();
    let mut holder = source.store.connect();
    let holder_token = OwnershipToken::generate();
    coordinator
        .acquire(&mut holder, &key("k"), &holder_token, Duration::from_secs(5))
        .await
        .unwrap();

    let invoker = GuardInvoker::new(source.clone());
    let waiter = tokio::spawn(async move {
        let options = LockOptions::default().with_wait(Duration::from_secs(2));
        invoker
            .run(&key("k"), options, || async { "shipped" })
            .await
            .unwrap()
    });

    tokio::time::sleep(Duration::from_millis(500)).await;
    coordinator
        .release(&mut holder, &key("k"), &holder_token)
        .await
        .unwrap();

    let outcome = waiter.await.unwrap();
    assert_eq!(outcome.into_acquired(), Some("shipped"));
    assert!(source.store.holder("k").is_none());
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_wait_returns_cancelled() {
    let source = CountingSource::default();
    let mut holder = source.store.connect();
    LockCoordinator::new()
        .acquire(
            &mut holder,
            &key("k"),
            &OwnershipToken::from("holder"),
            Duration::from_secs(60),
        )
        .await
        .unwrap();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(250)).await;
        trigger.cancel();
    });

    let ran = AtomicUsize::new(0);
    let options = LockOptions::default().with_wait(Duration::from_secs(10));
    let result = GuardInvoker::new(source.clone())
        .run_cancellable(&key("k"), options, &cancel, || async {
            ran.fetch_add(1, Ordering::SeqCst);
        })
        .await;

    assert!(matches!(result, Err(Error::Cancelled { .. })));
    assert_eq!(ran.load(Ordering::SeqCst), 0);
    assert_eq!(source.store.holder("k").as_deref(), Some("holder"));
    assert_eq!(source.returned(), 1);

    let attempts = source.store.set_attempts();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(source.store.set_attempts(), attempts);
}

#[tokio::test]
async fn test_already_cancelled_token_never_acquires() {
    let source = CountingSource::default();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = GuardInvoker::new(source.clone())
        .run_cancellable(&key("k"), LockOptions::default(), &cancel, || async { 1 })
        .await;

    assert!(matches!(result, Err(Error::Cancelled { .. })));
    assert_eq!(source.store.set_attempts(), 0);
    assert!(source.store.holder("k").is_none());
}

#[tokio::test]
async fn test_panicking_operation_still_releases() {
    let source = CountingSource::default();
    let invoker = GuardInvoker::new(source.clone());

    let joined = tokio::spawn(async move {
        invoker
            .run(&key("k"), LockOptions::default(), || async {
                if true {
                    panic!("guarded operation failed");
                }
                1u32
            })
            .await
    })
    .await;

    assert!(joined.unwrap_err().is_panic());
    assert!(source.store.holder("k").is_none());
    assert_eq!(source.returned(), 1);
}

#[tokio::test]
async fn test_operation_panicking_before_its_future_still_releases() {
    let source = CountingSource::default();
    let invoker = GuardInvoker::new(source.clone());

    let joined = tokio::spawn(async move {
        invoker
            .run(&key("k"), LockOptions::default(), || -> std::future::Ready<u32> {
                panic!("guarded operation failed to start")
            })
            .await
    })
    .await;

    assert!(joined.unwrap_err().is_panic());
    assert!(source.store.holder("k").is_none());
    assert_eq!(source.store.set_attempts(), 1);
    assert_eq!(source.returned(), 1);
}

#[tokio::test]
async fn test_run_with_caller_connection() {
    let store = MemoryLockStore::new();
    let mut connection = store.connect();
    let coordinator = LockCoordinator::new();
    let cancel = CancellationToken::new();

    let outcome = run_with_lock(
        &coordinator,
        &mut connection,
        &key("k"),
        LockOptions::default(),
        &cancel,
        || async { store.ttl("k") },
    )
    .await
    .unwrap();

    let ttl = outcome.into_acquired().flatten().unwrap();
    assert!(ttl <= Duration::from_secs(5));
    assert!(ttl > Duration::from_secs(4));
    assert!(store.holder("k").is_none());
}

#[tokio::test]
async fn test_each_run_uses_a_fresh_token() {
    let source = CountingSource::default();
    let store = source.store.clone();
    let invoker = GuardInvoker::new(source);

    let first = invoker
        .run(&key("k"), LockOptions::default(), || async { store.holder("k") })
        .await
        .unwrap()
        .into_acquired()
        .flatten();
    let second = invoker
        .run(&key("k"), LockOptions::default(), || async { store.holder("k") })
        .await
        .unwrap()
        .into_acquired()
        .flatten();

    assert!(first.is_some());
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_invoker_with_connection_skips_source() {
    let source = CountingSource::default();
    let invoker = GuardInvoker::new(source.clone());
    let mut connection = source.store.connect();

    let outcome = invoker
        .with_connection(&mut connection, &key("k"), LockOptions::default(), || async {
            source.store.holder("k").is_some()
        })
        .await
        .unwrap();

    assert_eq!(outcome.into_acquired(), Some(true));
    assert!(source.store.holder("k").is_none());
    assert_eq!(source.returned(), 0);
}
