use std::path::Path;

use chrono::NaiveDate;

use crate::{
    model::{self, CollectError, CycleReport},
    run_log::RunLogger,
    source::QuoteSource,
    store,
};

/// Downloads a symbol's full history and replaces its table with it.
pub async fn pull_symbol<S: QuoteSource>(
    source: &S,
    db_path: &Path,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> model::Result<usize> {
    let bars = source.daily_bars(symbol, start, end).await?;
    if bars.is_empty() {
        return Err(CollectError::EmptyResult(symbol.to_string()));
    }

    let mut conn = store::sqlite::open_connection(db_path)?;
    let written = store::daily_bar::replace_bars(&mut conn, symbol, &bars)?;
    Ok(written)
}

/// Single pass over `tickers`: history from `start` up to (excluding) `today` for each symbol.
pub async fn pull_and_save<S: QuoteSource>(
    tickers: &[String],
    db_path: &Path,
    start: NaiveDate,
    today: NaiveDate,
    source: &S,
    logger: &RunLogger,
) -> CycleReport {
    logger.log(&format!("Database will be saved to: {}", db_path.display()));

    let mut report = CycleReport::default();
    for symbol in tickers {
        logger.log(&format!("Fetching data for {}...", symbol));
        let result = pull_symbol(source, db_path, symbol, start, today).await;
        match &report.record(symbol, result).result {
            Ok(rows) => logger.log(&format!(
                "Saved {} to {} ({} rows in {})",
                symbol,
                db_path.display(),
                rows,
                store::daily_bar::table_name(symbol)
            )),
            Err(err) => logger.log(&format!("Error fetching {}: {}", symbol, err)),
        }
    }
    report
}
