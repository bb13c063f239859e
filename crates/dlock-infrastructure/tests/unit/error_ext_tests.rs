//! Error Extension Tests

use dlock_domain::error::{Error, Result};
use dlock_infrastructure::error_ext::ErrorContext;
use std::io;

fn not_found() -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, "file not found")
}

#[test]
fn test_store_context_is_store_unavailable() {
    let refused = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
    let result: Result<()> = Err(refused).store_context("PING failed");

    if let Err(Error::StoreUnavailable { source, message }) = result {
        assert!(message.contains("PING failed"));
        assert!(message.contains("refused"));
        assert!(source.is_some());
    } else {
        panic!("Expected StoreUnavailable error");
    }
}

#[test]
fn test_config_context() {
    let result: Result<()> = Err(not_found()).config_context("bad config");
    assert!(matches!(result, Err(Error::Configuration { source: Some(_), .. })));
}

#[test]
fn test_ok_passes_through() {
    let ok: std::result::Result<u8, io::Error> = Ok(1);
    assert_eq!(ok.store_context("unused").unwrap(), 1);
}
