//! In-memory lock store tests

use dlock_domain::Error;
use dlock_providers::LockConnection;
use dlock_providers::store::MemoryLockStore;
use std::time::Duration;

const EXPIRE: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_set_if_absent_creates_once() {
    let store = MemoryLockStore::new();
    let mut first = store.connect();
    let mut second = store.connect();

    assert!(first.set_if_absent("order:42", "t1", EXPIRE).await.unwrap());
    assert!(!second.set_if_absent("order:42", "t2", EXPIRE).await.unwrap());
    assert_eq!(store.holder("order:42").as_deref(), Some("t1"));
    assert_eq!(store.set_attempts(), 2);
}

#[tokio::test]
async fn test_compare_and_delete_checks_owner() {
    let store = MemoryLockStore::new();
    let mut connection = store.connect();
    connection.set_if_absent("order:42", "t1", EXPIRE).await.unwrap();

    assert!(!connection.compare_and_delete("order:42", "t2").await.unwrap());
    assert_eq!(store.holder("order:42").as_deref(), Some("t1"));

    assert!(connection.compare_and_delete("order:42", "t1").await.unwrap());
    assert!(store.holder("order:42").is_none());

    // Absent key is a no-op
    assert!(!connection.compare_and_delete("order:42", "t1").await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_records_expire() {
    let store = MemoryLockStore::new();
    let mut connection = store.connect();
    connection
        .set_if_absent("order:42", "t1", Duration::from_secs(1))
        .await
        .unwrap();
    assert!(store.ttl("order:42").is_some());

    tokio::time::advance(Duration::from_millis(1001)).await;

    assert!(store.holder("order:42").is_none());
    assert!(connection.set_if_absent("order:42", "t2", EXPIRE).await.unwrap());
}

#[tokio::test]
async fn test_sub_second_ttl_rejected() {
    let store = MemoryLockStore::new();
    let mut connection = store.connect();
    let result = connection
        .set_if_absent("order:42", "t1", Duration::from_millis(10))
        .await;
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    assert_eq!(store.set_attempts(), 0);
}

#[tokio::test]
async fn test_offline_store_reports_unavailable() {
    let store = MemoryLockStore::new();
    let mut connection = store.connect();
    store.set_unavailable(true);

    assert!(connection.ping().await.unwrap_err().is_store_unavailable());
    assert!(
        connection
            .set_if_absent("order:42", "t1", EXPIRE)
            .await
            .unwrap_err()
            .is_store_unavailable()
    );

    store.set_unavailable(false);
    assert!(connection.ping().await.is_ok());
}

#[tokio::test]
async fn test_oversized_ttl_rejected_and_store_stays_usable() {
    let store = MemoryLockStore::new();
    let mut connection = store.connect();

    for ttl in [Duration::from_secs(u64::MAX), Duration::MAX] {
        let result = connection.set_if_absent("order:42", "t1", ttl).await;
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    }

    assert!(store.holder("order:42").is_none());
    assert!(connection.set_if_absent("order:42", "t1", EXPIRE).await.unwrap());
    assert!(connection.ping().await.is_ok());
}
