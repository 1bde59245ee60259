use super::{super::model, sqlite::quote_ident};
use rusqlite::{Connection, Result, params};

pub const DATE_FORMAT: &str = "%Y-%m-%d 00:00:00";

/// Table holding a symbol's bars. `-` is not allowed in unquoted identifiers, so `BRK-B`
/// becomes `BRK_B`.
pub fn table_name(symbol: &str) -> String {
    symbol.replace('-', "_")
}

/// Drops the symbol's table and writes `bars` as its entire content, in one transaction.
/// Returns the number of rows written.
pub fn replace_bars(conn: &mut Connection, symbol: &str, bars: &[model::DailyBar]) -> Result<usize> {
    let table = quote_ident(&table_name(symbol));
    let transaction = conn.transaction()?;
    transaction.execute_batch(&format!(
        "DROP TABLE IF EXISTS {table};
        CREATE TABLE {table} (
            date TEXT NOT NULL,
            ticker TEXT NOT NULL,
            open REAL,
            high REAL,
            low REAL,
            close REAL,
            adj_close REAL,
            volume INTEGER
        );"
    ))?;
    {
        let mut stmt = transaction.prepare(&format!(
            "INSERT INTO {table} (date, ticker, open, high, low, close, adj_close, volume)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
        ))?;
        for bar in bars {
            stmt.execute(params![
                bar.date.format(DATE_FORMAT).to_string(),
                bar.ticker,
                bar.open,
                bar.high,
                bar.low,
                bar.close,
                bar.adj_close,
                bar.volume,
            ])?;
        }
    }
    transaction.commit()?;
    Ok(bars.len())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::store::sqlite::count_rows;

    fn bar(day: u32, close: f64) -> model::DailyBar {
        model::DailyBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            ticker: "BRK-B".into(),
            open: Some(close - 1.0),
            high: Some(close + 1.0),
            low: Some(close - 2.0),
            close: Some(close),
            adj_close: Some(close),
            volume: Some(1000 + day as i64),
        }
    }

    fn rows(conn: &Connection) -> Vec<(String, String, Option<f64>, Option<i64>)> {
        let mut stmt = conn
            .prepare("SELECT date, ticker, close, volume FROM BRK_B ORDER BY date")
            .unwrap();
        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))
            .unwrap()
            .collect::<Result<_>>()
            .unwrap()
    }

    #[test]
    fn sanitizes_table_names() {
        assert_eq!(table_name("BRK-B"), "BRK_B");
        assert_eq!(table_name("AAPL"), "AAPL");
    }

    #[test]
    fn writing_the_same_history_twice_does_not_duplicate() {
        let mut conn = Connection::open_in_memory().unwrap();
        let bars = vec![bar(2, 400.0), bar(3, 401.5)];

        assert_eq!(replace_bars(&mut conn, "BRK-B", &bars).unwrap(), 2);
        let first = rows(&conn);
        assert_eq!(replace_bars(&mut conn, "BRK-B", &bars).unwrap(), 2);

        assert_eq!(rows(&conn), first);
        assert_eq!(count_rows(&conn, "BRK_B").unwrap(), 2);
        assert_eq!(first[0].0, "2024-01-02 00:00:00");
        assert_eq!(first[0].1, "BRK-B");
    }

    #[test]
    fn new_history_replaces_old_rows() {
        let mut conn = Connection::open_in_memory().unwrap();
        replace_bars(&mut conn, "BRK-B", &[bar(2, 400.0), bar(3, 401.5), bar(4, 399.0)]).unwrap();

        let mut gap = bar(5, 398.0);
        gap.adj_close = None;
        gap.volume = None;
        replace_bars(&mut conn, "BRK-B", &[gap]).unwrap();

        let rows = rows(&conn);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].2, Some(398.0));
        assert_eq!(rows[0].3, None);
    }
}
