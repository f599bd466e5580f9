//! Synthetic history provider.
//!
//! Produces a random walk from a starting price of 100.0, weekdays only,
//! seeded from the BLAKE3 hash of the symbol so the same symbol always gets
//! the same path. Developer-only: every fetch logs a warning.

use super::provider::{DataSource, FetchError, HistoryProvider};
use crate::domain::{Bar, PriceSeries};
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Default)]
pub struct SyntheticProvider {
    as_of: Option<NaiveDate>,
}

impl SyntheticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the last generated day. Defaults to today (UTC).
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }
}

/// Deterministic weekday random walk over `(end - window_days, end]`.
pub fn generate_synthetic_bars(symbol: &str, window_days: u32, end: NaiveDate) -> Vec<Bar> {
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::new();
    let mut price = 100.0_f64;
    let mut current = end - Duration::days(i64::from(window_days)) + Duration::days(1);

    while current <= end {
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            let daily_return: f64 = rng.gen_range(-0.03..0.03);
            price *= 1.0 + daily_return;
            bars.push(Bar {
                date: current,
                close: price,
            });
        }
        current += Duration::days(1);
    }

    bars
}

impl HistoryProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn source(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn fetch(&self, symbol: &str, window_days: u32) -> Result<PriceSeries, FetchError> {
        tracing::warn!(symbol, "generating synthetic data; signals are not real");
        let end = self.as_of.unwrap_or_else(|| Utc::now().date_naive());
        Ok(PriceSeries::new(
            symbol,
            generate_synthetic_bars(symbol, window_days, end),
        )?)
    }
}
