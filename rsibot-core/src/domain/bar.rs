//! Bar: one day's closing price observation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Daily closing price for a single symbol.
///
/// Closes are the provider's adjusted close where one is available.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("close on {date} must be finite and positive, got {close}")]
    InvalidClose { date: NaiveDate, close: f64 },
}

impl Bar {
    /// Build a bar, rejecting NaN, infinite, zero and negative closes.
    pub fn new(date: NaiveDate, close: f64) -> Result<Self, BarError> {
        let bar = Self { date, close };
        if bar.is_sane() {
            Ok(bar)
        } else {
            Err(BarError::InvalidClose { date, close })
        }
    }

    pub fn is_sane(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}
