//! rsibot core: price series, indicators, signal evaluation, history providers.
//!
//! This crate holds everything that is pure or read-only:
//! - Domain types (`Bar`, `PriceSeries`)
//! - `Indicator` trait with RSI and SMA
//! - `IndicatorEngine` (aligned indicator points) and `SignalEvaluator`
//! - `HistoryProvider` capability with Yahoo, CSV and synthetic sources
//!
//! Dispatch (notification, orders) and orchestration live in `rsibot-runner`.

pub mod data;
pub mod domain;
pub mod indicators;
pub mod signals;
