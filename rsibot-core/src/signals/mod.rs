//! Signal pipeline: price series → indicator points → decision.
//!
//! Both stages are pure, synchronous and hold no state between calls.

pub mod engine;
pub mod evaluator;

pub use engine::{IndicatorEngine, IndicatorParams, IndicatorPoint};
pub use evaluator::{BuySignal, SignalEvaluator, SignalParams, SignalResult};
