//! Order submission.
//!
//! Only market buys are submitted. Each order carries a deterministic client
//! order id derived from the symbol, the signal bar's date and the quantity,
//! so a broker that enforces unique client ids rejects a second submission
//! for the same signal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderError {
    #[error("order transport failed: {0}")]
    Transport(String),

    #[error("order rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected broker response: {0}")]
    InvalidResponse(String),

    #[error("broker misconfigured: {0}")]
    Config(String),
}

/// Deterministic client order id (BLAKE3 of symbol, signal date, quantity).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientOrderId(pub String);

impl ClientOrderId {
    pub fn for_signal(symbol: &str, signal_date: NaiveDate, quantity: u32) -> Self {
        let key = format!("{symbol}|{signal_date}|{quantity}");
        let hash = blake3::hash(key.as_bytes()).to_hex().to_string();
        Self(format!("rsibot-{}", &hash[..32]))
    }
}

impl fmt::Display for ClientOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A market buy, good for the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyOrder {
    pub symbol: String,
    pub quantity: u32,
    pub client_order_id: ClientOrderId,
}

/// Broker acknowledgement. Acceptance, not a fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_id: String,
    pub client_order_id: ClientOrderId,
    pub status: String,
}

pub trait OrderSubmitter: Send + Sync {
    fn name(&self) -> &str;

    fn submit_market_buy(&self, order: &BuyOrder) -> Result<OrderConfirmation, OrderError>;
}

/// Accepts every order locally and logs it.
#[derive(Debug, Clone, Default)]
pub struct LogBroker;

impl OrderSubmitter for LogBroker {
    fn name(&self) -> &str {
        "log"
    }

    fn submit_market_buy(&self, order: &BuyOrder) -> Result<OrderConfirmation, OrderError> {
        tracing::info!(
            broker = "log",
            symbol = %order.symbol,
            quantity = order.quantity,
            client_order_id = %order.client_order_id,
            "market buy accepted locally"
        );
        Ok(OrderConfirmation {
            order_id: format!("local-{}", order.client_order_id),
            client_order_id: order.client_order_id.clone(),
            status: "accepted".to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct AlpacaOrder {
    id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct AlpacaError {
    #[serde(default)]
    message: Option<String>,
}

/// Alpaca trading API client (paper endpoint by default).
pub struct AlpacaBroker {
    client: reqwest::blocking::Client,
    base_url: String,
    key_id: String,
    secret_key: String,
}

impl AlpacaBroker {
    pub fn new(
        base_url: impl Into<String>,
        key_id: impl Into<String>,
        secret_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, OrderError> {
        let key_id = key_id.into();
        let secret_key = secret_key.into();
        if key_id.is_empty() || secret_key.is_empty() {
            return Err(OrderError::Config("alpaca key id and secret are required".into()));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OrderError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            key_id,
            secret_key,
        })
    }

    fn orders_url(&self) -> String {
        format!("{}/v2/orders", self.base_url)
    }

    fn order_body(order: &BuyOrder) -> serde_json::Value {
        serde_json::json!({
            "symbol": order.symbol,
            "qty": order.quantity.to_string(),
            "side": "buy",
            "type": "market",
            "time_in_force": "day",
            "client_order_id": order.client_order_id.0,
        })
    }

    fn parse_reply(
        order: &BuyOrder,
        status: u16,
        body: &str,
    ) -> Result<OrderConfirmation, OrderError> {
        if !(200..300).contains(&status) {
            let message = serde_json::from_str::<AlpacaError>(body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| body.to_string());
            return Err(OrderError::Rejected { status, message });
        }
        let accepted: AlpacaOrder = serde_json::from_str(body)
            .map_err(|e| OrderError::InvalidResponse(format!("{e}: {body}")))?;
        Ok(OrderConfirmation {
            order_id: accepted.id,
            client_order_id: order.client_order_id.clone(),
            status: accepted.status,
        })
    }
}

impl OrderSubmitter for AlpacaBroker {
    fn name(&self) -> &str {
        "alpaca"
    }

    fn submit_market_buy(&self, order: &BuyOrder) -> Result<OrderConfirmation, OrderError> {
        let resp = self
            .client
            .post(self.orders_url())
            .header("APCA-API-KEY-ID", &self.key_id)
            .header("APCA-API-SECRET-KEY", &self.secret_key)
            .json(&Self::order_body(order))
            .send()
            .map_err(|e| OrderError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| OrderError::Transport(e.to_string()))?;
        Self::parse_reply(order, status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> BuyOrder {
        BuyOrder {
            symbol: "AAPL".into(),
            quantity: 1,
            client_order_id: ClientOrderId::for_signal(
                "AAPL",
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                1,
            ),
        }
    }

    #[test]
    fn client_order_id_is_deterministic_per_signal() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let next = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let a = ClientOrderId::for_signal("AAPL", day, 1);
        assert_eq!(a, ClientOrderId::for_signal("AAPL", day, 1));
        assert_ne!(a, ClientOrderId::for_signal("AAPL", next, 1));
        assert_ne!(a, ClientOrderId::for_signal("MSFT", day, 1));
        assert_ne!(a, ClientOrderId::for_signal("AAPL", day, 2));
        assert!(a.0.starts_with("rsibot-"));
        assert_eq!(a.0.len(), "rsibot-".len() + 32);
    }

    #[test]
    fn order_body_is_day_market_buy() {
        let body = AlpacaBroker::order_body(&order());
        assert_eq!(body["symbol"], "AAPL");
        assert_eq!(body["qty"], "1");
        assert_eq!(body["side"], "buy");
        assert_eq!(body["type"], "market");
        assert_eq!(body["time_in_force"], "day");
        assert_eq!(body["client_order_id"], order().client_order_id.0);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let broker = AlpacaBroker::new(
            "https://paper-api.alpaca.markets/",
            "key",
            "secret",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(broker.orders_url(), "https://paper-api.alpaca.markets/v2/orders");
    }

    #[test]
    fn accepted_reply_becomes_confirmation() {
        let conf = AlpacaBroker::parse_reply(
            &order(),
            200,
            r#"{"id":"61e69015-8549-4bfd-b9c3-01e75843f47d","status":"accepted","symbol":"AAPL"}"#,
        )
        .unwrap();
        assert_eq!(conf.order_id, "61e69015-8549-4bfd-b9c3-01e75843f47d");
        assert_eq!(conf.status, "accepted");
        assert_eq!(conf.client_order_id, order().client_order_id);
    }

    #[test]
    fn rejection_carries_broker_message() {
        let err = AlpacaBroker::parse_reply(
            &order(),
            422,
            r#"{"code":40010001,"message":"client_order_id must be unique"}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            OrderError::Rejected {
                status: 422,
                message: "client_order_id must be unique".into()
            }
        );
    }

    #[test]
    fn garbage_success_body_is_invalid_response() {
        let err = AlpacaBroker::parse_reply(&order(), 200, "<html>").unwrap_err();
        assert!(matches!(err, OrderError::InvalidResponse(_)));
    }

    #[test]
    fn requires_credentials() {
        let err = AlpacaBroker::new("https://x", "", "s", Duration::from_secs(5)).err();
        assert!(matches!(err, Some(OrderError::Config(_))));
    }

    #[test]
    fn log_broker_echoes_client_id() {
        let conf = LogBroker.submit_market_buy(&order()).unwrap();
        assert_eq!(conf.client_order_id, order().client_order_id);
        assert_eq!(conf.status, "accepted");
    }
}
