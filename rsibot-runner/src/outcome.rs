//! Outcome of one cycle and its trigger-facing response.
//!
//! The trigger (HTTP endpoint, CLI, scheduler) maps an outcome to a status
//! code and a body. Informational outcomes are 200. A buy whose order failed
//! is 500 even if the alert went out, so the caller never reads it as a
//! successful buy.

use crate::dispatch::{BuyReport, BuyStatus};
use crate::runner::{RunError, Stage};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    InsufficientData {
        bars: usize,
        required: usize,
    },
    IndicatorsNotReady {
        date: NaiveDate,
    },
    NoSignal {
        date: NaiveDate,
        rsi: f64,
        close: f64,
        sma: f64,
    },
    Buy(BuyReport),
    Failed(RunError),
}

/// Status code and body for the trigger surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Flat, serializable view of an outcome for `--json` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    pub kind: String,
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_error: Option<String>,
}

impl Outcome {
    /// `Failed` for a failed cycle, `Done` for every signal outcome.
    pub fn terminal_stage(&self) -> Stage {
        match self {
            Outcome::Failed(_) => Stage::Failed,
            _ => Stage::Done,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::InsufficientData { .. } => "insufficient_data",
            Outcome::IndicatorsNotReady { .. } => "indicators_not_ready",
            Outcome::NoSignal { .. } => "no_signal",
            Outcome::Buy(report) => match report.status() {
                BuyStatus::Complete => "buy",
                BuyStatus::OrderedWithoutAlert => "buy_without_alert",
                BuyStatus::AlertedWithoutOrder => "alert_without_order",
                BuyStatus::Failed => "buy_failed",
            },
            Outcome::Failed(_) => "failed",
        }
    }

    pub fn response(&self) -> Response {
        let (status, body) = match self {
            Outcome::InsufficientData { bars, required } => (
                200,
                format!("Not enough history: {bars} bars, need {required}."),
            ),
            Outcome::IndicatorsNotReady { date } => {
                (200, format!("Indicators not ready as of {date}."))
            }
            Outcome::NoSignal {
                rsi, close, sma, ..
            } => (
                200,
                format!("No signal today. RSI: {rsi:.2}, Close: {close:.2}, SMA: {sma:.2}"),
            ),
            Outcome::Buy(report) => buy_response(report),
            Outcome::Failed(err) => (500, format!("Error: {err}")),
        };
        Response { status, body }
    }

    pub fn summary(&self) -> OutcomeSummary {
        let response = self.response();
        let mut summary = OutcomeSummary {
            kind: self.kind().to_string(),
            status: response.status,
            message: response.body,
            date: None,
            rsi: None,
            close: None,
            sma: None,
            order_id: None,
            client_order_id: None,
            notify_error: None,
            order_error: None,
        };
        match self {
            Outcome::IndicatorsNotReady { date } => summary.date = Some(*date),
            Outcome::NoSignal {
                date,
                rsi,
                close,
                sma,
            } => {
                summary.date = Some(*date);
                summary.rsi = Some(*rsi);
                summary.close = Some(*close);
                summary.sma = Some(*sma);
            }
            Outcome::Buy(report) => {
                summary.date = Some(report.signal.date);
                summary.rsi = Some(report.signal.rsi);
                summary.close = Some(report.signal.close);
                summary.sma = Some(report.signal.sma);
                summary.client_order_id = Some(report.order.client_order_id.to_string());
                summary.order_id = report.order_result.as_ref().ok().map(|c| c.order_id.clone());
                summary.notify_error = report.notify_result.as_ref().err().map(|e| e.to_string());
                summary.order_error = report.order_result.as_ref().err().map(|e| e.to_string());
            }
            Outcome::InsufficientData { .. } | Outcome::Failed(_) => {}
        }
        summary
    }
}

fn buy_response(report: &BuyReport) -> (u16, String) {
    let symbol = &report.symbol;
    match (&report.notify_result, &report.order_result) {
        (Ok(()), Ok(conf)) => (
            200,
            format!(
                "Buy signal triggered for {symbol}: alert sent, order {} {}.",
                conf.order_id, conf.status
            ),
        ),
        (Err(notify), Ok(conf)) => (
            200,
            format!(
                "Buy signal triggered for {symbol}: order {} {}, but the alert failed: {notify}.",
                conf.order_id, conf.status
            ),
        ),
        (Ok(()), Err(order)) => (
            500,
            format!(
                "Buy alert for {symbol} was sent but the order FAILED: {order}. No position was opened."
            ),
        ),
        (Err(notify), Err(order)) => (
            500,
            format!(
                "Buy signal for {symbol} could not be acted on: alert failed ({notify}); order failed ({order})."
            ),
        ),
    }
}
