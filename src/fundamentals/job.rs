use std::path::Path;

use chrono::NaiveDateTime;

use super::snapshot;
use crate::{
    clock::Clock,
    model::{self, CollectError, CycleReport},
    run_log::RunLogger,
    source::QuoteSource,
    store,
};

/// Fetches, normalizes and appends one symbol's snapshot. Opens its own connection.
pub async fn collect_symbol<S: QuoteSource>(
    source: &S,
    db_path: &Path,
    symbol: &str,
    now: NaiveDateTime,
) -> model::Result<usize> {
    let info = source.info(symbol).await?;
    if info.is_empty() {
        return Err(CollectError::EmptyResult(symbol.to_string()));
    }
    let snapshot = snapshot::build_snapshot(symbol, &info, now);

    let conn = store::sqlite::open_connection(db_path)?;
    let inserted = store::fundamentals::append_snapshot(&conn, &snapshot)?;
    Ok(inserted)
}

/// One pass over `tickers`, strictly in order. A failing symbol is logged and skipped.
pub async fn run_cycle<S: QuoteSource, C: Clock>(
    tickers: &[String],
    db_path: &Path,
    source: &S,
    clock: &C,
    logger: &RunLogger,
) -> CycleReport {
    let mut report = CycleReport::default();
    for symbol in tickers {
        logger.log(&format!("[{}] Fetching fundamental data...", symbol));
        let result = collect_symbol(source, db_path, symbol, clock.now()).await;
        match &report.record(symbol, result).result {
            Ok(_) => logger.log(&format!("[{}] Successfully saved fundamentals.", symbol)),
            Err(err) => logger.log(&format!("[{}] Error: {}", symbol, err)),
        }
    }
    report
}
