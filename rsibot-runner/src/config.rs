//! Bot configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) yields the
//! stock setup: AAPL, 100-day window, RSI(14) < 30 and close > SMA(5),
//! at least 20 bars, one share per order. Secrets are not part of this file;
//! the binary passes them to the client constructors.

use chrono::NaiveDate;
use rsibot_core::signals::{IndicatorParams, SignalParams};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Upper bound on `data.max_retries`.
pub const MAX_RETRIES_LIMIT: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which history provider to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    Yahoo,
    Csv,
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub source: SourceKind,
    /// Required when `source = "csv"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv_path: Option<PathBuf>,
    /// Last day of the history window for the csv and synthetic sources,
    /// written as a quoted `"YYYY-MM-DD"`. Today when unset. Yahoo ignores it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    /// Upper bound on a single history request.
    pub timeout_secs: u64,
    /// Provider-level retries; the runner itself never retries.
    /// At most [`MAX_RETRIES_LIMIT`].
    pub max_retries: u32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::Yahoo,
            csv_path: None,
            as_of: None,
            timeout_secs: 30,
            max_retries: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyChannel {
    #[default]
    Telegram,
    /// Write the alert to the log only.
    Log,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub channel: NotifyChannel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrokerKind {
    #[default]
    AlpacaPaper,
    /// Accept orders locally without contacting a broker.
    Log,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub kind: BrokerKind,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            kind: BrokerKind::AlpacaPaper,
            base_url: "https://paper-api.alpaca.markets".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Complete bot configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub symbol: String,
    /// Calendar days of history requested (trading days are fewer).
    pub window_days: u32,
    /// Shares per market buy.
    pub quantity: u32,
    pub indicators: IndicatorParams,
    pub signal: SignalParams,
    pub data: DataConfig,
    pub notify: NotifyConfig,
    pub broker: BrokerConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            symbol: "AAPL".to_string(),
            window_days: 100,
            quantity: 1,
            indicators: IndicatorParams::default(),
            signal: SignalParams::default(),
            data: DataConfig::default(),
            notify: NotifyConfig::default(),
            broker: BrokerConfig::default(),
        }
    }
}

impl BotConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid(msg.to_string()))
        };

        if self.symbol.trim().is_empty() {
            return invalid("symbol must not be empty");
        }
        if self.window_days == 0 {
            return invalid("window_days must be at least 1");
        }
        if self.quantity == 0 {
            return invalid("quantity must be at least 1");
        }
        if self.indicators.rsi_period == 0 {
            return invalid("indicators.rsi_period must be at least 1");
        }
        if self.indicators.sma_period == 0 {
            return invalid("indicators.sma_period must be at least 1");
        }
        if self.signal.min_bars == 0 {
            return invalid("signal.min_bars must be at least 1");
        }
        if !(self.signal.oversold > 0.0 && self.signal.oversold < 100.0) {
            return invalid("signal.oversold must be strictly between 0 and 100");
        }
        if self.data.source == SourceKind::Csv && self.data.csv_path.is_none() {
            return invalid("data.csv_path is required when data.source = \"csv\"");
        }
        if self.data.max_retries > MAX_RETRIES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "data.max_retries must be at most {MAX_RETRIES_LIMIT}"
            )));
        }
        if self.data.timeout_secs == 0 || self.broker.timeout_secs == 0 {
            return invalid("timeouts must be at least 1 second");
        }

        let warmup = self.indicators.rsi_period.max(self.indicators.sma_period.saturating_sub(1)) + 1;
        if self.signal.min_bars < warmup {
            tracing::warn!(
                min_bars = self.signal.min_bars,
                warmup,
                "min_bars is below the indicator warm-up; expect IndicatorsNotReady outcomes"
            );
        }
        Ok(())
    }
}
