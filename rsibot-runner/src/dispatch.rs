//! ActionDispatcher: turns a buy decision into one alert and one order.
//!
//! Order of calls: notify first, then submit. A failed alert does not stop
//! the order. Neither call is retried here; retries belong to the client.

use crate::broker::{BuyOrder, ClientOrderId, OrderConfirmation, OrderError, OrderSubmitter};
use crate::notify::{NotifyError, Notifier};
use crate::outcome::Outcome;
use rsibot_core::signals::{BuySignal, SignalResult};

/// How far a buy got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuyStatus {
    /// Alert delivered and order accepted.
    Complete,
    /// Order accepted; the alert was lost.
    OrderedWithoutAlert,
    /// Alert delivered but the order failed. The user was told about a
    /// buy that did not happen.
    AlertedWithoutOrder,
    /// Neither call succeeded.
    Failed,
}

/// Everything that happened while dispatching a buy.
#[derive(Debug, Clone, PartialEq)]
pub struct BuyReport {
    pub symbol: String,
    pub signal: BuySignal,
    pub message: String,
    pub order: BuyOrder,
    pub notify_result: Result<(), NotifyError>,
    pub order_result: Result<OrderConfirmation, OrderError>,
}

impl BuyReport {
    pub fn status(&self) -> BuyStatus {
        match (self.notify_result.is_ok(), self.order_result.is_ok()) {
            (true, true) => BuyStatus::Complete,
            (false, true) => BuyStatus::OrderedWithoutAlert,
            (true, false) => BuyStatus::AlertedWithoutOrder,
            (false, false) => BuyStatus::Failed,
        }
    }

    pub fn order_placed(&self) -> bool {
        self.order_result.is_ok()
    }
}

#[derive(Debug, Clone)]
pub struct ActionDispatcher {
    quantity: u32,
    sma_period: usize,
}

impl ActionDispatcher {
    /// `sma_period` only labels the alert text.
    pub fn new(quantity: u32, sma_period: usize) -> Self {
        Self {
            quantity,
            sma_period,
        }
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn format_message(&self, symbol: &str, signal: &BuySignal) -> String {
        format!(
            "📈 BUY SIGNAL for {symbol}!\nRSI: {:.2}, Close: {:.2}, SMA({}): {:.2}",
            signal.rsi, signal.close, self.sma_period, signal.sma
        )
    }

    /// Only `Buy` touches the collaborators; every other result maps
    /// straight to its outcome.
    pub fn dispatch(
        &self,
        symbol: &str,
        result: SignalResult,
        notifier: &dyn Notifier,
        broker: &dyn OrderSubmitter,
    ) -> Outcome {
        let signal = match result {
            SignalResult::Buy(signal) => signal,
            SignalResult::InsufficientData { bars, required } => {
                return Outcome::InsufficientData { bars, required }
            }
            SignalResult::IndicatorsNotReady { date } => {
                return Outcome::IndicatorsNotReady { date }
            }
            SignalResult::NoSignal {
                date,
                rsi,
                close,
                sma,
            } => {
                return Outcome::NoSignal {
                    date,
                    rsi,
                    close,
                    sma,
                }
            }
        };

        let message = self.format_message(symbol, &signal);
        let notify_result = notifier.send(&message);
        match &notify_result {
            Ok(()) => tracing::info!(symbol, notifier = notifier.name(), "buy alert sent"),
            Err(e) => tracing::warn!(
                symbol,
                notifier = notifier.name(),
                error = %e,
                "buy alert failed; submitting order anyway"
            ),
        }

        let order = BuyOrder {
            symbol: symbol.to_string(),
            quantity: self.quantity,
            client_order_id: ClientOrderId::for_signal(symbol, signal.date, self.quantity),
        };
        let order_result = broker.submit_market_buy(&order);
        match (&order_result, &notify_result) {
            (Ok(conf), _) => tracing::info!(
                symbol,
                broker = broker.name(),
                order_id = %conf.order_id,
                status = %conf.status,
                "market buy submitted"
            ),
            (Err(e), Ok(())) => tracing::error!(
                symbol,
                broker = broker.name(),
                error = %e,
                "order failed after the alert was sent; the alert reports a buy that did not happen"
            ),
            (Err(e), Err(_)) => tracing::error!(
                symbol,
                broker = broker.name(),
                error = %e,
                "order failed"
            ),
        }

        Outcome::Buy(BuyReport {
            symbol: symbol.to_string(),
            signal,
            message,
            order,
            notify_result,
            order_result,
        })
    }
}
