//! Domain types for rsibot

pub mod bar;
pub mod series;

pub use bar::{Bar, BarError};
pub use series::{PriceSeries, SeriesError};
