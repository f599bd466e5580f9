//! Yahoo Finance history provider.
//!
//! Fetches daily closes from Yahoo's v8 chart API. Handles request timeouts,
//! rate limiting, retries with exponential backoff, response parsing, and the
//! circuit breaker. Retries live here, inside the provider; the runner never
//! retries a fetch.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.
//! The CSV provider is the fallback when Yahoo is unavailable.

use super::circuit_breaker::CircuitBreaker;
use super::provider::{DataSource, FetchError, HistoryProvider};
use crate::domain::{Bar, PriceSeries};
use chrono::{Duration as DateDuration, NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    circuit_breaker: Arc<CircuitBreaker>,
    timeout: Duration,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooProvider {
    /// Every request is bounded by `timeout`; exceeding it surfaces as
    /// [`FetchError::Timeout`].
    pub fn new(circuit_breaker: Arc<CircuitBreaker>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| FetchError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            circuit_breaker,
            timeout,
            max_retries: 2,
            base_delay: Duration::from_millis(500),
        })
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Point the provider at another host (a mirror or a local test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the chart API URL for a symbol and date range.
    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_hms_opt(0, 0, 0).map_or(0, |dt| dt.and_utc().timestamp());
        let end_ts = end
            .and_hms_opt(23, 59, 59)
            .map_or(0, |dt| dt.and_utc().timestamp());
        format!(
            "{}/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d\
             &includeAdjustedClose=true",
            self.base_url
        )
    }

    /// Parse the chart API response into bars, preferring the adjusted close.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<Bar>, FetchError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    FetchError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    FetchError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                FetchError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::ResponseFormatChanged("result array is empty".into()))?;

        // A symbol with no trading days in range comes back without timestamps.
        let Some(timestamps) = data.timestamp else {
            return Ok(Vec::new());
        };

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::ResponseFormatChanged("no quote data".into()))?;

        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let mut bars: Vec<Bar> = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| {
                    FetchError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let adjusted = adj_closes.as_ref().and_then(|v| v.get(i).copied().flatten());
            let close = adjusted.or_else(|| quote.close.get(i).copied().flatten());

            // Holidays and half-populated rows carry no close.
            let Some(close) = close else {
                continue;
            };

            // Yahoo occasionally repeats the live bar; keep the later value.
            if let Some(last) = bars.last_mut() {
                if last.date == date {
                    last.close = close;
                    continue;
                }
            }
            bars.push(Bar { date, close });
        }

        Ok(bars)
    }

    fn map_transport_error(&self, e: &reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                after_secs: self.timeout.as_secs(),
            }
        } else {
            FetchError::NetworkUnreachable(e.to_string())
        }
    }

    /// Execute the request with retry and circuit breaker logic.
    fn fetch_with_retry(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, FetchError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(FetchError::CircuitBreakerTripped);
        }

        let url = self.chart_url(symbol, start, end);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self
                    .base_delay
                    .saturating_mul(2u32.saturating_pow(attempt - 1));
                tracing::debug!(symbol, attempt, delay_ms = delay.as_millis() as u64, "retrying fetch");
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(FetchError::CircuitBreakerTripped);
            }

            match self.client.get(&url).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::FORBIDDEN {
                        // IP ban: immediately trip the circuit breaker
                        self.circuit_breaker.trip();
                        return Err(FetchError::CircuitBreakerTripped);
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        self.circuit_breaker.record_failure();
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        last_error = Some(FetchError::RateLimited {
                            retry_after_secs: retry_after,
                        });
                        continue;
                    }

                    if status == reqwest::StatusCode::UNAUTHORIZED {
                        return Err(FetchError::AuthenticationRequired(
                            "Yahoo Finance requires authentication".into(),
                        ));
                    }

                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(FetchError::SymbolNotFound {
                            symbol: symbol.to_string(),
                        });
                    }

                    if !status.is_success() {
                        self.circuit_breaker.record_failure();
                        last_error = Some(FetchError::Other(format!("HTTP {status} for {symbol}")));
                        continue;
                    }

                    let chart: ChartResponse = resp.json().map_err(|e| {
                        if e.is_timeout() {
                            self.map_transport_error(&e)
                        } else {
                            FetchError::ResponseFormatChanged(format!(
                                "failed to parse response for {symbol}: {e}"
                            ))
                        }
                    })?;

                    let bars = Self::parse_response(symbol, chart)?;
                    self.circuit_breaker.record_success();
                    return Ok(bars);
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        self.circuit_breaker.record_failure();
                        last_error = Some(self.map_transport_error(&e));
                        continue;
                    }
                    return Err(self.map_transport_error(&e));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| FetchError::Other("max retries exceeded".into())))
    }
}

impl HistoryProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn source(&self) -> DataSource {
        DataSource::YahooFinance
    }

    fn fetch(&self, symbol: &str, window_days: u32) -> Result<PriceSeries, FetchError> {
        let end = Utc::now().date_naive();
        let start = end - DateDuration::days(i64::from(window_days));
        tracing::debug!(symbol, %start, %end, "fetching chart");
        let bars = self.fetch_with_retry(symbol, start, end)?;
        Ok(PriceSeries::from_unsorted(symbol, bars)?)
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}
