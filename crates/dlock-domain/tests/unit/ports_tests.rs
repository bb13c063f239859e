//! Lock connection port tests

use async_trait::async_trait;
use dlock_domain::{Error, LockConnection, Result};
use std::time::Duration;

/// Records calls and answers from a fixed script
#[derive(Default)]
struct RecordingConnection {
    calls: Vec<String>,
    offline: bool,
}

#[async_trait]
impl LockConnection for RecordingConnection {
    async fn set_if_absent(&mut self, key: &str, token: &str, ttl: Duration) -> Result<bool> {
        self.calls.push(format!("set {key} {token} {}", ttl.as_secs()));
        Ok(true)
    }

    async fn compare_and_delete(&mut self, key: &str, token: &str) -> Result<bool> {
        self.calls.push(format!("cad {key} {token}"));
        Ok(false)
    }

    async fn ping(&mut self) -> Result<()> {
        self.calls.push("ping".to_string());
        if self.offline {
            Err(Error::store_unavailable("offline"))
        } else {
            Ok(())
        }
    }
}

async fn exercise<C: LockConnection + ?Sized>(connection: &mut C) -> Result<(bool, bool)> {
    connection.ping().await?;
    let set = connection
        .set_if_absent("order:42", "t1", Duration::from_secs(5))
        .await?;
    let deleted = connection.compare_and_delete("order:42", "t2").await?;
    Ok((set, deleted))
}

#[tokio::test]
async fn test_mutable_reference_forwards_calls() {
    let mut inner = RecordingConnection::default();
    let mut borrowed = &mut inner;

    assert_eq!(exercise(&mut borrowed).await.unwrap(), (true, false));
    assert_eq!(
        inner.calls,
        vec!["ping", "set order:42 t1 5", "cad order:42 t2"]
    );
}

#[tokio::test]
async fn test_boxed_trait_object_forwards_calls() {
    let mut boxed: Box<dyn LockConnection> = Box::new(RecordingConnection::default());
    assert_eq!(exercise(&mut boxed).await.unwrap(), (true, false));
}

#[tokio::test]
async fn test_store_failure_propagates_through_box() {
    let mut boxed: Box<dyn LockConnection> = Box::new(RecordingConnection {
        offline: true,
        ..RecordingConnection::default()
    });
    let err = exercise(&mut boxed).await.unwrap_err();
    assert!(err.is_store_unavailable());
}
