//! History provider trait and structured fetch errors.
//!
//! `HistoryProvider` abstracts over price sources (Yahoo Finance, CSV file,
//! synthetic walk) so the runner can swap implementations and tests can
//! substitute fakes.

use crate::domain::{PriceSeries, SeriesError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for history fetches.
///
/// Designed to be displayable as the body of a failed run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("request timed out after {after_secs}s")]
    Timeout { after_secs: u64 },

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("provider returned no bars for {symbol}")]
    EmptySeries { symbol: String },

    #[error("malformed series: {0}")]
    MalformedSeries(#[from] SeriesError),

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("I/O error: {0}")]
    Io(String),

    #[error("fetch error: {0}")]
    Other(String),
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    Csv,
    Synthetic,
}

/// Trait for history providers.
pub trait HistoryProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    fn source(&self) -> DataSource;

    /// Fetch the daily closes for `symbol` over the trailing `window_days`
    /// calendar days, ending today (or the provider's reference date).
    ///
    /// An empty result is returned as `Ok`; the caller decides whether an
    /// empty series is an error.
    fn fetch(&self, symbol: &str, window_days: u32) -> Result<PriceSeries, FetchError>;

    /// Check if the provider is currently available (not rate-limited, not blocked).
    fn is_available(&self) -> bool {
        true
    }
}
