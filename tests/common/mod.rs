//! Shared helpers for integration tests.

#![allow(dead_code)]

use bestbasis::{Histogram, Mask};
use proptest::test_runner::Config as ProptestConfig;
use std::sync::Once;

static INIT_LOGGING: Once = Once::new();

/// Installs a test-writer subscriber once per test binary.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

/// Proptest configuration with a fixed case count and no failure persistence.
pub fn test_proptest_config(cases: u32) -> ProptestConfig {
    ProptestConfig {
        cases,
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

/// Builds an `n`-variable histogram from integer-encoded states.
pub fn histogram(n: usize, states: &[u64]) -> Histogram {
    Histogram::from_states(n, states.iter().map(|&v| Mask::from_u64(n, v)))
        .expect("non-empty states")
}

/// Four records over three variables: `111` twice, `000` and `100`.
pub fn worked_example() -> Histogram {
    histogram(3, &[0b111, 0b111, 0b000, 0b100])
}

/// Integer-encoded masks of a basis.
pub fn mask_values(masks: &[Mask]) -> Vec<u64> {
    masks
        .iter()
        .map(|m| m.to_u64().expect("fits in u64"))
        .collect()
}

/// Phase tracking macro for structured test logging.
#[macro_export]
macro_rules! test_phase {
    ($name:expr) => {
        tracing::info!(test = $name, "=== TEST START ===");
    };
}

/// Marks the end of a test in the log.
#[macro_export]
macro_rules! test_complete {
    ($name:expr) => {
        tracing::info!(test = $name, "=== TEST COMPLETE ===");
    };
}

/// Assertion with logging for better test output.
#[macro_export]
macro_rules! assert_with_log {
    ($cond:expr, $msg:expr, $expected:expr, $actual:expr) => {
        if !$cond {
            tracing::error!(
                message = $msg,
                expected = ?$expected,
                actual = ?$actual,
                "Assertion failed"
            );
        }
        assert!($cond, "{}: expected {:?}, got {:?}", $msg, $expected, $actual);
    };
}
