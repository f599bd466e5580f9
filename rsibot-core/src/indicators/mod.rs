//! Indicator trait and the two concrete indicators the bot reads.
//!
//! Indicators are pure functions: bar history in, one value per bar out.
//! A value is `None` while the indicator is still warming up. Absent is not
//! zero: an RSI of 0 reads as "extremely oversold", so a warm-up value must
//! never be defaulted into the decision rule.

pub mod rsi;
pub mod sma;

pub use rsi::{FlatRsi, Rsi, RsiMethod};
pub use sma::Sma;

use crate::domain::Bar;

/// Trait for indicators.
///
/// # Look-ahead contamination guard
/// No indicator value at bar t may depend on price data from bar t+1 or later.
/// Every indicator must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_5", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading bars for which the output is always `None`.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    ///
    /// Returns a vector of the same length as `bars`.
    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>>;
}

/// Create bars from close prices for testing, one calendar day apart.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: base_date + chrono::Duration::days(i as i64),
            close,
        })
        .collect()
}

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
