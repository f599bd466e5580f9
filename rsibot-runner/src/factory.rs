//! Builds the runner's collaborators from config and credentials.

use std::sync::Arc;
use std::time::Duration;

use rsibot_core::data::{
    CircuitBreaker, CsvProvider, FetchError, HistoryProvider, SyntheticProvider, YahooProvider,
};
use thiserror::Error;

use crate::broker::{AlpacaBroker, LogBroker, OrderError, OrderSubmitter};
use crate::config::{BotConfig, BrokerKind, NotifyChannel, SourceKind};
use crate::notify::{LogNotifier, NotifyError, Notifier, TelegramNotifier};
use crate::runner::BotRunner;

#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
    #[error("history provider: {0}")]
    Provider(#[from] FetchError),
    #[error("notifier: {0}")]
    Notifier(#[from] NotifyError),
    #[error("broker: {0}")]
    Broker(#[from] OrderError),
    #[error("data.csv_path is required for the csv source")]
    MissingCsvPath,
}

/// Secrets supplied by the environment, never by the config file.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub alpaca_key_id: Option<String>,
    pub alpaca_secret_key: Option<String>,
}

fn required(value: &Option<String>, name: &'static str) -> Result<String, FactoryError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(FactoryError::MissingCredential(name)),
    }
}

pub fn build_provider(config: &BotConfig) -> Result<Box<dyn HistoryProvider>, FactoryError> {
    let provider: Box<dyn HistoryProvider> = match config.data.source {
        SourceKind::Yahoo => {
            if config.data.as_of.is_some() {
                tracing::warn!("data.as_of is ignored by the yahoo source");
            }
            let breaker = Arc::new(CircuitBreaker::default_provider());
            Box::new(
                YahooProvider::new(breaker, Duration::from_secs(config.data.timeout_secs))?
                    .with_max_retries(config.data.max_retries),
            )
        }
        SourceKind::Csv => {
            let path = config
                .data
                .csv_path
                .as_ref()
                .ok_or(FactoryError::MissingCsvPath)?;
            let mut csv = CsvProvider::new(path);
            if let Some(as_of) = config.data.as_of {
                csv = csv.with_as_of(as_of);
            }
            Box::new(csv)
        }
        SourceKind::Synthetic => {
            let mut synthetic = SyntheticProvider::new();
            if let Some(as_of) = config.data.as_of {
                synthetic = synthetic.with_as_of(as_of);
            }
            Box::new(synthetic)
        }
    };
    Ok(provider)
}

/// `dry_run` swaps in the logging notifier regardless of config.
pub fn build_notifier(
    config: &BotConfig,
    creds: &Credentials,
    dry_run: bool,
) -> Result<Box<dyn Notifier>, FactoryError> {
    if dry_run || config.notify.channel == NotifyChannel::Log {
        return Ok(Box::new(LogNotifier));
    }
    let token = required(&creds.telegram_token, "TELEGRAM_TOKEN")?;
    let chat_id = required(&creds.telegram_chat_id, "CHAT_ID")?;
    Ok(Box::new(TelegramNotifier::new(
        token,
        chat_id,
        Duration::from_secs(config.broker.timeout_secs),
    )?))
}

/// `dry_run` swaps in the logging broker regardless of config.
pub fn build_broker(
    config: &BotConfig,
    creds: &Credentials,
    dry_run: bool,
) -> Result<Box<dyn OrderSubmitter>, FactoryError> {
    if dry_run || config.broker.kind == BrokerKind::Log {
        return Ok(Box::new(LogBroker));
    }
    let key_id = required(&creds.alpaca_key_id, "ALPACA_API_KEY")?;
    let secret = required(&creds.alpaca_secret_key, "ALPACA_SECRET_KEY")?;
    Ok(Box::new(AlpacaBroker::new(
        config.broker.base_url.clone(),
        key_id,
        secret,
        Duration::from_secs(config.broker.timeout_secs),
    )?))
}

pub fn build_runner(
    config: &BotConfig,
    creds: &Credentials,
    dry_run: bool,
) -> Result<BotRunner, FactoryError> {
    let provider = build_provider(config)?;
    let notifier = build_notifier(config, creds, dry_run)?;
    let broker = build_broker(config, creds, dry_run)?;
    tracing::debug!(
        provider = provider.name(),
        notifier = notifier.name(),
        broker = broker.name(),
        dry_run,
        "runner assembled"
    );
    Ok(BotRunner::new(config, provider, notifier, broker))
}
