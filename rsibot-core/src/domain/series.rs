//! PriceSeries: the ordered bar history for one symbol.

use super::bar::{Bar, BarError};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("bar dates must be strictly increasing: {previous} is followed by {next}")]
    NonIncreasingDate { previous: NaiveDate, next: NaiveDate },

    #[error(transparent)]
    InvalidBar(#[from] BarError),
}

/// Daily bars for one symbol, ascending by date with no duplicate dates.
///
/// The invariant is checked once in [`PriceSeries::new`]; every other
/// constructor, deserialization included, goes through it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries")]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

/// Unvalidated wire shape of [`PriceSeries`].
#[derive(Deserialize)]
struct RawSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl TryFrom<RawSeries> for PriceSeries {
    type Error = SeriesError;

    fn try_from(raw: RawSeries) -> Result<Self, Self::Error> {
        Self::new(raw.symbol, raw.bars)
    }
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        for bar in &bars {
            if !bar.is_sane() {
                return Err(BarError::InvalidClose {
                    date: bar.date,
                    close: bar.close,
                }
                .into());
            }
        }
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::NonIncreasingDate {
                    previous: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    /// Sort by date first, then validate. Duplicate dates are still rejected.
    pub fn from_unsorted(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Result<Self, SeriesError> {
        bars.sort_by_key(|b| b.date);
        Self::new(symbol, bars)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Keep bars with `as_of - window_days < date <= as_of`.
    pub fn trailing(&self, window_days: u32, as_of: NaiveDate) -> Self {
        let start = as_of - Duration::days(i64::from(window_days));
        Self {
            symbol: self.symbol.clone(),
            bars: self
                .bars
                .iter()
                .filter(|b| b.date > start && b.date <= as_of)
                .copied()
                .collect(),
        }
    }
}
