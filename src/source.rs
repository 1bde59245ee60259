use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::{http::client::RequestError, model};

/// Flat key/value snapshot of a symbol's fundamentals and quote fields, keyed by provider name.
pub type InfoMap = Map<String, Value>;

/// Remote market data provider consumed by both jobs.
pub trait QuoteSource {
    /// Daily bars for `symbol` from `start` (inclusive) to `end` (exclusive).
    async fn daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<model::DailyBar>, RequestError>;

    /// Current fundamentals/quote snapshot for `symbol`.
    async fn info(&self, symbol: &str) -> Result<InfoMap, RequestError>;
}
