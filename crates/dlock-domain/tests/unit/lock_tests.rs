//! Unit tests for lock value objects

use dlock_domain::constants::LOCK_MAX_EXPIRE_SECS;
use dlock_domain::value_objects::expire_to_secs;
use dlock_domain::{Error, LockKey, LockOptions, LockOutcome, OwnershipToken};
use std::collections::HashSet;
use std::time::Duration;

#[test]
fn test_lock_key_accepts_names() {
    let key = LockKey::new("order:42").unwrap();
    assert_eq!(key.as_str(), "order:42");
    assert_eq!(key.to_string(), "order:42");
}

#[test]
fn test_lock_key_rejects_blank() {
    assert!(matches!(
        LockKey::new(""),
        Err(Error::InvalidArgument { .. })
    ));
    assert!(matches!(
        LockKey::new("   "),
        Err(Error::InvalidArgument { .. })
    ));
}

#[test]
fn test_lock_key_deserialize_validates() {
    let key: LockKey = serde_json::from_str("\"REDIS_LOCK\"").unwrap();
    assert_eq!(key.as_str(), "REDIS_LOCK");

    let blank: Result<LockKey, _> = serde_json::from_str("\"\"");
    assert!(blank.is_err());
}

#[test]
fn test_ownership_tokens_are_unique() {
    let tokens: HashSet<OwnershipToken> = (0..1000).map(|_| OwnershipToken::generate()).collect();
    assert_eq!(tokens.len(), 1000);
}

#[test]
fn test_lock_options_default_expiry() {
    let options = LockOptions::default();
    assert_eq!(options.expire, Duration::from_secs(5));
    assert_eq!(options.wait, None);
    assert_eq!(options.expire_secs().unwrap(), 5);
}

#[test]
fn test_lock_options_builder() {
    let options = LockOptions::new(Duration::from_secs(30)).with_wait(Duration::from_millis(500));
    assert_eq!(options.expire_secs().unwrap(), 30);
    assert_eq!(options.wait, Some(Duration::from_millis(500)));
}

#[test]
fn test_sub_second_expiry_is_rejected() {
    let options = LockOptions::new(Duration::from_millis(999));
    assert!(matches!(
        options.expire_secs(),
        Err(Error::InvalidArgument { .. })
    ));
}

#[test]
fn test_oversized_expiry_is_rejected() {
    assert_eq!(
        expire_to_secs(Duration::from_secs(LOCK_MAX_EXPIRE_SECS)).unwrap(),
        LOCK_MAX_EXPIRE_SECS
    );
    for expire in [
        Duration::from_secs(LOCK_MAX_EXPIRE_SECS + 1),
        Duration::from_secs(u64::MAX),
        Duration::MAX,
    ] {
        assert!(matches!(
            LockOptions::new(expire).expire_secs(),
            Err(Error::InvalidArgument { .. })
        ));
    }
}

#[test]
fn test_expiry_truncates_to_whole_seconds() {
    let options = LockOptions::new(Duration::from_millis(2500));
    assert_eq!(options.expire_secs().unwrap(), 2);
}

#[test]
fn test_lock_outcome_helpers() {
    let acquired = LockOutcome::Acquired(21).map(|v| v * 2);
    assert!(acquired.is_acquired());
    assert_eq!(acquired.into_acquired(), Some(42));

    let contended: LockOutcome<i32> = LockOutcome::Contended;
    assert!(!contended.is_acquired());
    assert_eq!(contended.into_acquired(), None);
}
