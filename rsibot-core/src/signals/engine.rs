//! IndicatorEngine: one aligned indicator point per bar.

use crate::domain::PriceSeries;
use crate::indicators::{FlatRsi, Indicator, Rsi, RsiMethod, Sma};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Indicator parameters. Defaults: RSI(14) simple average, SMA(5), absent
/// RSI for flat windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub sma_period: usize,
    pub rsi_method: RsiMethod,
    pub flat_rsi: FlatRsi,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            sma_period: 5,
            rsi_method: RsiMethod::Simple,
            flat_rsi: FlatRsi::Absent,
        }
    }
}

/// Close plus both indicators for one bar.
///
/// `rsi` and `sma` are `None` during warm-up, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub rsi: Option<f64>,
    pub sma: Option<f64>,
}

impl IndicatorPoint {
    /// Both indicators are defined.
    pub fn is_ready(&self) -> bool {
        self.rsi.is_some() && self.sma.is_some()
    }
}

/// Computes RSI and SMA over a price series.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    rsi: Rsi,
    sma: Sma,
}

impl IndicatorEngine {
    pub fn new(params: &IndicatorParams) -> Self {
        Self {
            rsi: Rsi::with_method(params.rsi_period, params.rsi_method, params.flat_rsi),
            sma: Sma::new(params.sma_period),
        }
    }

    /// Bars needed before both indicators can be defined.
    pub fn warmup_bars(&self) -> usize {
        self.rsi.lookback().max(self.sma.lookback()) + 1
    }

    /// Pure: the output has the same length as the series and point `i`
    /// depends only on bars `0..=i`.
    pub fn compute(&self, series: &PriceSeries) -> Vec<IndicatorPoint> {
        let bars = series.bars();
        let rsi = self.rsi.compute(bars);
        let sma = self.sma.compute(bars);

        bars.iter()
            .zip(rsi)
            .zip(sma)
            .map(|((bar, rsi), sma)| IndicatorPoint {
                date: bar.date,
                close: bar.close,
                rsi,
                sma,
            })
            .collect()
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(&IndicatorParams::default())
    }
}
