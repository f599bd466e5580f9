//! BotRunner: one fetch → compute → evaluate → dispatch cycle.
//!
//! A cycle is a straight line through `Stage`s ending in `Done` or `Failed`.
//! Fetch failures end it in `Failed` with `Outcome::Failed`; every other path
//! reaches `Done` with a signal outcome. The runner holds no state between
//! cycles and never retries.

use std::fmt;

use rsibot_core::data::{FetchError, HistoryProvider};
use rsibot_core::domain::PriceSeries;
use rsibot_core::signals::{IndicatorEngine, IndicatorPoint, SignalEvaluator};
use thiserror::Error;

use crate::broker::OrderSubmitter;
use crate::config::BotConfig;
use crate::dispatch::ActionDispatcher;
use crate::notify::Notifier;
use crate::outcome::Outcome;

/// Where a cycle is (or stopped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Computing,
    Evaluating,
    Dispatching,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Fetching => "fetching",
            Stage::Computing => "computing",
            Stage::Evaluating => "evaluating",
            Stage::Dispatching => "dispatching",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Errors that abort a cycle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunError {
    #[error("failed to fetch history for {symbol}: {source}")]
    Fetch {
        symbol: String,
        #[source]
        source: FetchError,
    },
    #[error("provider returned {received} when {requested} was requested")]
    SymbolMismatch { requested: String, received: String },
}

impl RunError {
    /// Stage the cycle was in when it failed. Both variants stop it before
    /// indicators are computed.
    pub fn stage(&self) -> Stage {
        match self {
            RunError::Fetch { .. } | RunError::SymbolMismatch { .. } => Stage::Fetching,
        }
    }
}

pub struct BotRunner {
    window_days: u32,
    engine: IndicatorEngine,
    evaluator: SignalEvaluator,
    dispatcher: ActionDispatcher,
    provider: Box<dyn HistoryProvider>,
    notifier: Box<dyn Notifier>,
    broker: Box<dyn OrderSubmitter>,
}

impl BotRunner {
    pub fn new(
        config: &BotConfig,
        provider: Box<dyn HistoryProvider>,
        notifier: Box<dyn Notifier>,
        broker: Box<dyn OrderSubmitter>,
    ) -> Self {
        Self {
            window_days: config.window_days,
            engine: IndicatorEngine::new(&config.indicators),
            evaluator: SignalEvaluator::new(config.signal.clone()),
            dispatcher: ActionDispatcher::new(config.quantity, config.indicators.sma_period),
            provider,
            notifier,
            broker,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Run one full cycle for `symbol`.
    pub fn run_once(&self, symbol: &str) -> Outcome {
        let span = tracing::info_span!("cycle", symbol, provider = self.provider.name());
        let _guard = span.enter();

        tracing::info!(stage = %Stage::Fetching, window_days = self.window_days, "fetching history");
        let series = match self.fetch(symbol) {
            Ok(series) => series,
            Err(err) => {
                tracing::error!(
                    stage = %Stage::Failed,
                    failed_at = %err.stage(),
                    error = %err,
                    "cycle failed"
                );
                return Outcome::Failed(err);
            }
        };

        tracing::debug!(stage = %Stage::Computing, bars = series.len(), "computing indicators");
        let points = self.engine.compute(&series);
        if let Some(latest) = points.last() {
            tracing::debug!(
                date = %latest.date,
                close = latest.close,
                rsi = ?latest.rsi,
                sma = ?latest.sma,
                "latest indicators"
            );
        }

        tracing::debug!(stage = %Stage::Evaluating, "evaluating signal");
        let result = self.evaluator.evaluate(&points);
        tracing::info!(result = result.kind(), "signal evaluated");

        if result.is_buy() {
            tracing::info!(stage = %Stage::Dispatching, "dispatching buy");
        }
        let outcome = self.dispatcher.dispatch(
            symbol,
            result,
            self.notifier.as_ref(),
            self.broker.as_ref(),
        );

        tracing::info!(stage = %outcome.terminal_stage(), outcome = outcome.kind(), "cycle finished");
        outcome
    }

    /// Fetch and compute without evaluating or dispatching.
    pub fn indicators(&self, symbol: &str) -> Result<Vec<IndicatorPoint>, RunError> {
        let series = self.fetch(symbol)?;
        Ok(self.engine.compute(&series))
    }

    fn fetch(&self, symbol: &str) -> Result<PriceSeries, RunError> {
        let series = self
            .provider
            .fetch(symbol, self.window_days)
            .map_err(|source| RunError::Fetch {
                symbol: symbol.to_string(),
                source,
            })?;

        if !series.symbol().eq_ignore_ascii_case(symbol) {
            return Err(RunError::SymbolMismatch {
                requested: symbol.to_string(),
                received: series.symbol().to_string(),
            });
        }
        if series.is_empty() {
            return Err(RunError::Fetch {
                symbol: symbol.to_string(),
                source: FetchError::EmptySeries {
                    symbol: symbol.to_string(),
                },
            });
        }
        tracing::debug!(
            bars = series.len(),
            first = ?series.bars().first().map(|b| b.date),
            last = ?series.last().map(|b| b.date),
            "history fetched"
        );
        Ok(series)
    }
}
