//! rsibot runner: configuration, dispatch and the daily cycle.
//!
//! This crate builds on `rsibot-core` to provide:
//! - TOML bot configuration
//! - Notifier (Telegram, log) and order submitter (Alpaca, log) clients
//! - `ActionDispatcher`: one alert then one market buy per buy signal
//! - `BotRunner`: fetch → compute → evaluate → dispatch, mapped to an `Outcome`
//! - Factory that assembles a runner from config and credentials

pub mod broker;
pub mod config;
pub mod dispatch;
pub mod factory;
pub mod notify;
pub mod outcome;
pub mod runner;

pub use broker::{
    AlpacaBroker, BuyOrder, ClientOrderId, LogBroker, OrderConfirmation, OrderError,
    OrderSubmitter,
};
pub use config::{BotConfig, BrokerKind, ConfigError, NotifyChannel, SourceKind};
pub use dispatch::{ActionDispatcher, BuyReport, BuyStatus};
pub use factory::{build_runner, Credentials, FactoryError};
pub use notify::{LogNotifier, Notifier, NotifyError, TelegramNotifier};
pub use outcome::{Outcome, OutcomeSummary, Response};
pub use runner::{BotRunner, RunError, Stage};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_is_send_sync() {
        assert_send::<BotConfig>();
        assert_sync::<BotConfig>();
    }

    #[test]
    fn outcome_is_send_sync() {
        assert_send::<Outcome>();
        assert_sync::<Outcome>();
        assert_send::<BuyReport>();
        assert_sync::<BuyReport>();
    }

    #[test]
    fn runner_is_send_sync() {
        assert_send::<BotRunner>();
        assert_sync::<BotRunner>();
    }

    #[test]
    fn clients_are_send_sync() {
        assert_send::<TelegramNotifier>();
        assert_sync::<TelegramNotifier>();
        assert_send::<AlpacaBroker>();
        assert_sync::<AlpacaBroker>();
    }
}
