//! Relative Strength Index (RSI).
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period (needs `period` close-to-close deltas).
//!
//! Two averaging methods are supported:
//! - `Simple`: rolling mean of the last `period` gains and losses.
//! - `Wilder`: seeded with the simple mean of the first `period` deltas, then
//!   smoothed with alpha = 1/period.
//!
//! Edge cases: avg_loss == 0 with gains → 100; avg_gain == avg_loss == 0 is
//! decided by [`FlatRsi`].

use super::Indicator;
use crate::domain::Bar;
use serde::{Deserialize, Serialize};

/// How gains and losses are averaged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiMethod {
    #[default]
    Simple,
    Wilder,
}

/// RSI value when the window has neither gains nor losses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlatRsi {
    /// Leave the value absent; evaluation reports the indicator as not ready.
    #[default]
    Absent,
    /// Report 50.
    Neutral,
}

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    method: RsiMethod,
    flat: FlatRsi,
    name: String,
}

impl Rsi {
    /// Simple-average RSI with the absent flat-market policy.
    /// `period` of zero is clamped to 1.
    pub fn new(period: usize) -> Self {
        Self::with_method(period, RsiMethod::Simple, FlatRsi::Absent)
    }

    pub fn with_method(period: usize, method: RsiMethod, flat: FlatRsi) -> Self {
        let period = period.max(1);
        let name = match method {
            RsiMethod::Simple => format!("rsi_{period}"),
            RsiMethod::Wilder => format!("rsi_wilder_{period}"),
        };
        Self {
            period,
            method,
            flat,
            name,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    fn value(&self, avg_gain: f64, avg_loss: f64) -> Option<f64> {
        if avg_loss == 0.0 && avg_gain == 0.0 {
            match self.flat {
                FlatRsi::Absent => None,
                FlatRsi::Neutral => Some(50.0),
            }
        } else if avg_loss == 0.0 {
            Some(100.0)
        } else {
            Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
        }
    }

    fn compute_simple(&self, gains: &[f64], losses: &[f64], result: &mut [Option<f64>]) {
        let p = self.period;
        for i in p..gains.len() {
            let window = (i + 1 - p)..=i;
            let avg_gain = gains[window.clone()].iter().sum::<f64>() / p as f64;
            let avg_loss = losses[window].iter().sum::<f64>() / p as f64;
            result[i] = self.value(avg_gain, avg_loss);
        }
    }

    fn compute_wilder(&self, gains: &[f64], losses: &[f64], result: &mut [Option<f64>]) {
        let p = self.period;
        let mut avg_gain = gains[1..=p].iter().sum::<f64>() / p as f64;
        let mut avg_loss = losses[1..=p].iter().sum::<f64>() / p as f64;
        result[p] = self.value(avg_gain, avg_loss);

        let alpha = 1.0 / p as f64;
        for i in (p + 1)..gains.len() {
            avg_gain = alpha * gains[i] + (1.0 - alpha) * avg_gain;
            avg_loss = alpha * losses[i] + (1.0 - alpha) * avg_loss;
            result[i] = self.value(avg_gain, avg_loss);
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let n = bars.len();
        let mut result = vec![None; n];

        if n < self.period + 1 {
            return result;
        }

        // Index 0 has no delta; it is never inside a window.
        let mut gains = vec![0.0; n];
        let mut losses = vec![0.0; n];
        for i in 1..n {
            let change = bars[i].close - bars[i - 1].close;
            gains[i] = change.max(0.0);
            losses[i] = (-change).max(0.0);
        }

        match self.method {
            RsiMethod::Simple => self.compute_simple(&gains, &losses, &mut result),
            RsiMethod::Wilder => self.compute_wilder(&gains, &losses, &mut result),
        }

        result
    }
}
