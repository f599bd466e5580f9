//! SignalEvaluator: the oversold-rebound decision rule.
//!
//! Buy when the latest point has RSI below the oversold threshold and the
//! close above its short SMA. Only the last point is inspected.

use super::engine::IndicatorPoint;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Decision thresholds. Defaults: oversold below 30, at least 20 points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalParams {
    pub oversold: f64,
    pub min_bars: usize,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            min_bars: 20,
        }
    }
}

/// Indicator values behind a buy decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuySignal {
    pub date: NaiveDate,
    pub rsi: f64,
    pub close: f64,
    pub sma: f64,
}

/// Result of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignalResult {
    /// Fewer points than `min_bars`.
    InsufficientData { bars: usize, required: usize },
    /// Latest point still has an absent RSI or SMA.
    IndicatorsNotReady { date: NaiveDate },
    /// Indicators ready, rule false.
    NoSignal {
        date: NaiveDate,
        rsi: f64,
        close: f64,
        sma: f64,
    },
    Buy(BuySignal),
}

impl SignalResult {
    pub fn is_buy(&self) -> bool {
        matches!(self, SignalResult::Buy(_))
    }

    /// Short machine-readable label.
    pub fn kind(&self) -> &'static str {
        match self {
            SignalResult::InsufficientData { .. } => "insufficient_data",
            SignalResult::IndicatorsNotReady { .. } => "indicators_not_ready",
            SignalResult::NoSignal { .. } => "no_signal",
            SignalResult::Buy(_) => "buy",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignalEvaluator {
    params: SignalParams,
}

impl SignalEvaluator {
    pub fn new(params: SignalParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SignalParams {
        &self.params
    }

    pub fn evaluate(&self, points: &[IndicatorPoint]) -> SignalResult {
        if points.len() < self.params.min_bars {
            return SignalResult::InsufficientData {
                bars: points.len(),
                required: self.params.min_bars,
            };
        }

        // min_bars is validated >= 1 by config; an empty slice can still
        // arrive when a caller builds params by hand.
        let Some(latest) = points.last() else {
            return SignalResult::InsufficientData {
                bars: 0,
                required: self.params.min_bars,
            };
        };

        let (Some(rsi), Some(sma)) = (latest.rsi, latest.sma) else {
            return SignalResult::IndicatorsNotReady { date: latest.date };
        };

        if rsi < self.params.oversold && latest.close > sma {
            SignalResult::Buy(BuySignal {
                date: latest.date,
                rsi,
                close: latest.close,
                sma,
            })
        } else {
            SignalResult::NoSignal {
                date: latest.date,
                rsi,
                close: latest.close,
                sma,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(i: i64, close: f64, rsi: Option<f64>, sma: Option<f64>) -> IndicatorPoint {
        IndicatorPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i),
            close,
            rsi,
            sma,
        }
    }

    fn history(last: IndicatorPoint, len: usize) -> Vec<IndicatorPoint> {
        let mut points: Vec<_> = (0..len as i64 - 1)
            .map(|i| point(i, 100.0, None, None))
            .collect();
        points.push(last);
        points
    }

    #[test]
    fn short_history_is_insufficient() {
        let eval = SignalEvaluator::default();
        let points = history(point(18, 101.0, Some(10.0), Some(100.0)), 19);
        assert_eq!(
            eval.evaluate(&points),
            SignalResult::InsufficientData {
                bars: 19,
                required: 20
            }
        );
    }

    #[test]
    fn absent_indicator_is_not_ready_even_with_buy_shaped_values() {
        let eval = SignalEvaluator::default();
        let points = history(point(19, 101.0, None, Some(100.0)), 20);
        assert!(matches!(
            eval.evaluate(&points),
            SignalResult::IndicatorsNotReady { .. }
        ));

        let points = history(point(19, 101.0, Some(5.0), None), 20);
        assert!(matches!(
            eval.evaluate(&points),
            SignalResult::IndicatorsNotReady { .. }
        ));
    }

    #[test]
    fn oversold_and_above_sma_is_buy() {
        let eval = SignalEvaluator::default();
        let last = point(19, 101.0, Some(25.0), Some(100.0));
        let result = eval.evaluate(&history(last, 20));
        assert_eq!(
            result,
            SignalResult::Buy(BuySignal {
                date: last.date,
                rsi: 25.0,
                close: 101.0,
                sma: 100.0
            })
        );
        assert!(result.is_buy());
    }

    #[test]
    fn thresholds_are_strict() {
        let eval = SignalEvaluator::default();
        // rsi == oversold
        let r = eval.evaluate(&history(point(19, 101.0, Some(30.0), Some(100.0)), 20));
        assert_eq!(r.kind(), "no_signal");
        // close == sma
        let r = eval.evaluate(&history(point(19, 100.0, Some(10.0), Some(100.0)), 20));
        assert_eq!(r.kind(), "no_signal");
        // close below sma
        let r = eval.evaluate(&history(point(19, 99.0, Some(10.0), Some(100.0)), 20));
        assert_eq!(r.kind(), "no_signal");
    }

    #[test]
    fn custom_params() {
        let eval = SignalEvaluator::new(SignalParams {
            oversold: 40.0,
            min_bars: 2,
        });
        let r = eval.evaluate(&history(point(1, 101.0, Some(35.0), Some(100.0)), 2));
        assert!(r.is_buy());
    }

    #[test]
    fn zero_min_bars_with_empty_input() {
        let eval = SignalEvaluator::new(SignalParams {
            oversold: 30.0,
            min_bars: 0,
        });
        assert_eq!(eval.evaluate(&[]).kind(), "insufficient_data");
    }

    #[test]
    fn result_serializes_with_kind_tag() {
        let r = SignalResult::InsufficientData {
            bars: 3,
            required: 20,
        };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["kind"], "insufficient_data");
        assert_eq!(json["bars"], 3);
    }
}
