//! Notification channel.
//!
//! Delivery is best-effort: the dispatcher records a failed send and still
//! submits the order.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NotifyError {
    #[error("notification transport failed: {0}")]
    Transport(String),

    #[error("notification rejected (HTTP {status}): {description}")]
    Rejected { status: u16, description: String },

    #[error("notifier misconfigured: {0}")]
    Config(String),
}

/// Sends a human-readable alert.
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    fn send(&self, message: &str) -> Result<(), NotifyError>;
}

/// Writes alerts to the log. Used for dry runs and when no chat is configured.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    fn send(&self, message: &str) -> Result<(), NotifyError> {
        tracing::info!(channel = "log", %message, "alert");
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct TelegramReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram Bot API `sendMessage` client.
pub struct TelegramNotifier {
    client: reqwest::blocking::Client,
    token: String,
    chat_id: String,
    api_base: String,
}

impl TelegramNotifier {
    pub fn new(
        token: impl Into<String>,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let token = token.into();
        let chat_id = chat_id.into();
        if token.is_empty() || chat_id.is_empty() {
            return Err(NotifyError::Config(
                "telegram token and chat id are required".into(),
            ));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            token,
            chat_id,
            api_base: "https://api.telegram.org".to_string(),
        })
    }

    fn send_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.token)
    }

    fn payload(&self, message: &str) -> serde_json::Value {
        serde_json::json!({
            "chat_id": self.chat_id,
            "text": message,
        })
    }

    fn check_reply(status: u16, body: &str) -> Result<(), NotifyError> {
        let reply: Option<TelegramReply> = serde_json::from_str(body).ok();
        match reply {
            Some(TelegramReply { ok: true, .. }) if (200..300).contains(&status) => Ok(()),
            Some(TelegramReply { description, .. }) => Err(NotifyError::Rejected {
                status,
                description: description.unwrap_or_else(|| "no description".into()),
            }),
            None => Err(NotifyError::Rejected {
                status,
                description: format!("unparseable reply: {body}"),
            }),
        }
    }
}

impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    fn send(&self, message: &str) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(self.send_url())
            .json(&self.payload(message))
            .send()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        Self::check_reply(status, &body)
    }
}
