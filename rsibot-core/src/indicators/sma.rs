//! Simple Moving Average (SMA).
//!
//! Arithmetic mean of the last `period` closes.
//! Lookback: period - 1 (first value at index period-1).

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    /// `period` of zero is clamped to 1.
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let mut result = vec![None; bars.len()];

        // Each window is summed directly so the value at i is exactly
        // mean(closes[i-period+1..=i]) with no drift from a running sum.
        for (offset, window) in bars.windows(self.period).enumerate() {
            let sum: f64 = window.iter().map(|b| b.close).sum();
            result[offset + self.period - 1] = Some(sum / self.period as f64);
        }

        result
    }
}
