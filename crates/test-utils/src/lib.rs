//! Shared test utilities for the AirHub workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Test data path helpers and fixture loading
//! - Hex index and geometry generators
//! - A recording mock of the AirHub HTTP API
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{load_fixture, MockServer, MockResponse};
//! ```

pub mod fixtures;
pub mod generators;
pub mod mock_server;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use mock_server::*;
pub use paths::*;

/// Install a test tracing subscriber honouring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Assert that a JSON byte buffer equals the expected text exactly.
///
/// Failure output shows both sides as strings rather than byte arrays.
#[macro_export]
macro_rules! assert_json_bytes_eq {
    ($actual:expr, $expected:expr) => {{
        let actual: &[u8] = &$actual;
        let expected: &str = $expected;
        assert_eq!(String::from_utf8_lossy(actual), expected);
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_json_bytes_eq() {
        assert_json_bytes_eq!(b"{\"a\":1}".to_vec(), r#"{"a":1}"#);
    }

    #[test]
    fn test_init_tracing_is_idempotent() {
        super::init_tracing();
        super::init_tracing();
    }
}
