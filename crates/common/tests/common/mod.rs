//! Shared test utilities for keychain integration tests
#![allow(dead_code)]

/// Install a tracing subscriber reading `RUST_LOG`, once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
