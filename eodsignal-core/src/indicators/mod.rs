//! Streaming indicator primitives.
//!
//! Every primitive is single-pass and O(1) per push, and reports `None`
//! rather than zero while its window is still warming up. Callers hold one
//! instance per instrument and call `reset()` when the instrument changes.

pub mod atr;
pub mod rsi;
pub mod sma;
pub mod window;

pub use atr::{true_range, WilderAtr};
pub use rsi::WilderRsi;
pub use sma::SimpleMovingAverage;
pub use window::RollingWindow;

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
