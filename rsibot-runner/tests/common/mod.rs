//! Shared fakes for runner integration tests.
//!
//! Every fake writes to one journal so tests can assert call order across
//! the provider, notifier and broker.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rsibot_core::data::{DataSource, FetchError, HistoryProvider};
use rsibot_core::domain::{Bar, PriceSeries};
use rsibot_runner::{
    BotConfig, BotRunner, BuyOrder, NotifyError, Notifier, OrderConfirmation, OrderError,
    OrderSubmitter,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Fetch { symbol: String, window_days: u32 },
    Notify(String),
    Submit(BuyOrder),
}

pub type Journal = Arc<Mutex<Vec<Call>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(journal: &Journal) -> Vec<Call> {
    journal.lock().unwrap().clone()
}

pub struct FakeProvider {
    pub result: Result<PriceSeries, FetchError>,
    pub journal: Journal,
}

impl HistoryProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    fn source(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn fetch(&self, symbol: &str, window_days: u32) -> Result<PriceSeries, FetchError> {
        self.journal.lock().unwrap().push(Call::Fetch {
            symbol: symbol.to_string(),
            window_days,
        });
        self.result.clone()
    }
}

pub struct RecordingNotifier {
    pub fail: bool,
    pub journal: Journal,
}

impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    fn send(&self, message: &str) -> Result<(), NotifyError> {
        self.journal
            .lock()
            .unwrap()
            .push(Call::Notify(message.to_string()));
        if self.fail {
            Err(NotifyError::Transport("connection reset".into()))
        } else {
            Ok(())
        }
    }
}

pub struct RecordingBroker {
    pub fail: bool,
    pub journal: Journal,
}

impl OrderSubmitter for RecordingBroker {
    fn name(&self) -> &str {
        "recording"
    }

    fn submit_market_buy(&self, order: &BuyOrder) -> Result<OrderConfirmation, OrderError> {
        self.journal
            .lock()
            .unwrap()
            .push(Call::Submit(order.clone()));
        if self.fail {
            Err(OrderError::Rejected {
                status: 403,
                message: "insufficient buying power".into(),
            })
        } else {
            Ok(OrderConfirmation {
                order_id: "ord-1".into(),
                client_order_id: order.client_order_id.clone(),
                status: "accepted".into(),
            })
        }
    }
}

pub fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: base + chrono::Duration::days(i as i64),
            close,
        })
        .collect();
    PriceSeries::new(symbol, bars).unwrap()
}

/// 130 down to 106 over 25 bars, then a bounce to 110 on 2024-01-27.
/// RSI(14) = 400/17, SMA(5) = 108: a buy.
pub fn buy_closes() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..25).map(|i| 130.0 - i as f64).collect();
    closes.push(110.0);
    closes
}

/// Same downtrend with a bounce to 150: RSI ≈ 77.2, no signal.
pub fn no_signal_closes() -> Vec<f64> {
    let mut closes = buy_closes();
    closes.pop();
    closes.push(150.0);
    closes
}

pub fn buy_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 27).unwrap()
}

pub struct Harness {
    pub runner: BotRunner,
    pub journal: Journal,
}

pub fn harness(
    provider_result: Result<PriceSeries, FetchError>,
    notify_fails: bool,
    order_fails: bool,
) -> Harness {
    let journal = journal();
    let runner = BotRunner::new(
        &BotConfig::default(),
        Box::new(FakeProvider {
            result: provider_result,
            journal: journal.clone(),
        }),
        Box::new(RecordingNotifier {
            fail: notify_fails,
            journal: journal.clone(),
        }),
        Box::new(RecordingBroker {
            fail: order_fails,
            journal: journal.clone(),
        }),
    );
    Harness { runner, journal }
}
