use std::{error::Error, fmt::Display};

use chrono::NaiveDate;

use crate::{http::client, store::schema::SchemaError};

/// One end-of-day OHLCV bar. Prices and volume are missing when the provider has a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBar {
    pub date: NaiveDate,         // Trading day in the exchange's calendar.
    pub ticker: String,          // Symbol as requested from the provider.
    pub open: Option<f64>,       // Opening price.
    pub high: Option<f64>,       // Highest price.
    pub low: Option<f64>,        // Lowest price.
    pub close: Option<f64>,      // Closing price.
    pub adj_close: Option<f64>,  // Close adjusted for splits and dividends.
    pub volume: Option<i64>,     // Trading volume.
}

pub type Result<T> = std::result::Result<T, CollectError>;

/// Failure of a single symbol's step. Never aborts the surrounding loop.
#[derive(Debug)]
pub enum CollectError {
    Provider(client::RequestError),
    EmptyResult(String),
    Database(rusqlite::Error),
    Schema(SchemaError),
}

impl Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Provider(e) => write!(f, "provider call failed: {}", e),
            CollectError::EmptyResult(symbol) => write!(f, "provider returned no data for {}", symbol),
            CollectError::Database(e) => write!(f, "database error: {}", e),
            CollectError::Schema(e) => write!(f, "schema error: {}", e),
        }
    }
}

impl Error for CollectError {}

impl From<rusqlite::Error> for CollectError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Database(value)
    }
}

impl From<client::RequestError> for CollectError {
    fn from(value: client::RequestError) -> Self {
        Self::Provider(value)
    }
}

impl From<SchemaError> for CollectError {
    fn from(value: SchemaError) -> Self {
        match value {
            SchemaError::Database(e) => Self::Database(e),
            other => Self::Schema(other),
        }
    }
}

/// Outcome of one symbol within a job pass.
#[derive(Debug)]
pub struct SymbolOutcome {
    pub symbol: String,
    pub result: Result<usize>, // Rows written on success.
}

/// Per-symbol results of one pass over a ticker list.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub outcomes: Vec<SymbolOutcome>,
}

impl CycleReport {
    pub fn record(&mut self, symbol: &str, result: Result<usize>) -> &SymbolOutcome {
        self.outcomes.push(SymbolOutcome {
            symbol: symbol.to_string(),
            result,
        });
        &self.outcomes[self.outcomes.len() - 1]
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failed_symbols(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_err())
            .map(|o| o.symbol.as_str())
            .collect()
    }
}
