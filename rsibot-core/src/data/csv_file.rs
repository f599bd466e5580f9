//! CSV history provider.
//!
//! Reads daily closes from a local file with a header row. Required columns
//! are `date` (YYYY-MM-DD) and `close`; an optional `symbol` column lets one
//! file hold several tickers. Other columns (open, high, volume, ...) are
//! ignored, so a Yahoo CSV export loads as-is.

use super::provider::{DataSource, FetchError, HistoryProvider};
use crate::domain::{Bar, PriceSeries};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(default, alias = "Symbol")]
    symbol: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CsvProvider {
    path: PathBuf,
    as_of: Option<NaiveDate>,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            as_of: None,
        }
    }

    /// Pin the end of the trailing window. Defaults to today (UTC).
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_bars(&self, symbol: &str) -> Result<Vec<Bar>, FetchError> {
        let mut reader = csv::Reader::from_path(&self.path)
            .map_err(|e| FetchError::Io(format!("{}: {e}", self.path.display())))?;

        let mut bars = Vec::new();
        for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row.map_err(|e| {
                FetchError::ResponseFormatChanged(format!(
                    "{} row {}: {e}",
                    self.path.display(),
                    line + 2
                ))
            })?;
            if let Some(row_symbol) = &row.symbol {
                if !row_symbol.eq_ignore_ascii_case(symbol) {
                    continue;
                }
            }
            bars.push(Bar {
                date: row.date,
                close: row.close,
            });
        }
        Ok(bars)
    }
}

impl HistoryProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn source(&self) -> DataSource {
        DataSource::Csv
    }

    fn fetch(&self, symbol: &str, window_days: u32) -> Result<PriceSeries, FetchError> {
        let bars = self.read_bars(symbol)?;
        let series = PriceSeries::from_unsorted(symbol, bars)?;
        let as_of = self.as_of.unwrap_or_else(|| Utc::now().date_naive());
        Ok(series.trailing(window_days, as_of))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn reads_sorts_and_windows() {
        let file = write_csv(
            "date,open,close,volume\n\
             2024-03-04,1,12.5,100\n\
             2024-01-02,1,10.0,100\n\
             2024-03-01,1,11.0,100\n",
        );
        let provider = CsvProvider::new(file.path()).with_as_of(day(3, 4));
        let series = provider.fetch("AAPL", 10).unwrap();
        assert_eq!(series.symbol(), "AAPL");
        assert_eq!(series.closes(), vec![11.0, 12.5]);
        assert_eq!(series.bars()[0].date, day(3, 1));
    }

    #[test]
    fn yahoo_export_headers() {
        let file = write_csv("Date,Open,Close\n2024-01-02,1,185.5\n");
        let series = CsvProvider::new(file.path())
            .with_as_of(day(1, 3))
            .fetch("AAPL", 100)
            .unwrap();
        assert_eq!(series.closes(), vec![185.5]);
    }

    #[test]
    fn filters_by_symbol_column() {
        let file = write_csv(
            "symbol,date,close\n\
             AAPL,2024-01-02,10.0\n\
             MSFT,2024-01-02,300.0\n\
             aapl,2024-01-03,11.0\n",
        );
        let series = CsvProvider::new(file.path())
            .with_as_of(day(1, 3))
            .fetch("AAPL", 100)
            .unwrap();
        assert_eq!(series.closes(), vec![10.0, 11.0]);
    }

    #[test]
    fn duplicate_dates_are_malformed() {
        let file = write_csv("date,close\n2024-01-02,10.0\n2024-01-02,11.0\n");
        let err = CsvProvider::new(file.path())
            .with_as_of(day(1, 3))
            .fetch("AAPL", 100)
            .unwrap_err();
        assert!(matches!(err, FetchError::MalformedSeries(_)));
    }

    #[test]
    fn bad_row_reports_line() {
        let file = write_csv("date,close\n2024-01-02,abc\n");
        let err = CsvProvider::new(file.path()).fetch("AAPL", 100).unwrap_err();
        match err {
            FetchError::ResponseFormatChanged(msg) => assert!(msg.contains("row 2")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = CsvProvider::new("/nonexistent/rsibot.csv")
            .fetch("AAPL", 100)
            .unwrap_err();
        assert!(matches!(err, FetchError::Io(_)));
    }
}
