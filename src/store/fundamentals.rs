use rusqlite::{Connection, params_from_iter, types::Value as SqlValue};
use serde_json::Value;

use super::{schema, sqlite::quote_ident};
use crate::{constants, fundamentals::snapshot::Snapshot};

// JSON scalars map onto SQLite storage classes; arrays and objects are kept as JSON text.
fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(*b as i64),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map(SqlValue::Real).unwrap_or(SqlValue::Null),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

/// Appends one snapshot as a new row of the shared fundamentals table, creating or migrating
/// the table first.
pub fn append_snapshot(conn: &Connection, snapshot: &Snapshot) -> Result<usize, schema::SchemaError> {
    schema::ensure_fundamentals_table(conn)?;

    let mut columns = vec![quote_ident("ticker"), quote_ident("time_scraped")];
    let mut values = vec![
        SqlValue::Text(snapshot.ticker.clone()),
        SqlValue::Text(snapshot.time_scraped_text()),
    ];
    for (column, value) in &snapshot.fields {
        columns.push(quote_ident(column));
        values.push(to_sql_value(value));
    }
    let placeholders = (1..=values.len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");

    let inserted = conn.execute(
        &format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(constants::FUNDAMENTALS_TABLE),
            columns.join(", "),
            placeholders
        ),
        params_from_iter(values.iter()),
    )?;
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};
    use serde_json::json;

    use super::*;
    use crate::{
        fundamentals::{mapping::FIELD_MAPPING, snapshot::build_snapshot},
        source::InfoMap,
        store::sqlite::{count_rows, open_connection},
    };

    #[test]
    fn converts_json_values() {
        assert_eq!(to_sql_value(&Value::Null), SqlValue::Null);
        assert_eq!(to_sql_value(&json!(true)), SqlValue::Integer(1));
        assert_eq!(to_sql_value(&json!(42)), SqlValue::Integer(42));
        assert_eq!(to_sql_value(&json!(0.25)), SqlValue::Real(0.25));
        assert_eq!(to_sql_value(&json!("buy")), SqlValue::Text("buy".into()));
        assert_eq!(to_sql_value(&json!([1, 2])), SqlValue::Text("[1,2]".into()));
    }

    #[test]
    fn snapshots_accumulate_in_time_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fundamentals.db");
        let start = NaiveDate::from_ymd_opt(2025, 3, 4)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();

        let mut info = InfoMap::new();
        info.insert("bid".into(), json!(189.5));
        for i in 0..3 {
            // Fresh connection per write, as the jobs do.
            let conn = open_connection(&path).unwrap();
            let snapshot = build_snapshot("AAPL", &info, start + Duration::minutes(10 * i));
            assert_eq!(append_snapshot(&conn, &snapshot).unwrap(), 1);
        }

        let conn = open_connection(&path).unwrap();
        assert_eq!(count_rows(&conn, constants::FUNDAMENTALS_TABLE).unwrap(), 3);
        let mut stmt = conn
            .prepare("SELECT ticker, time_scraped, bid, ask FROM stock_fundamentals ORDER BY rowid")
            .unwrap();
        let rows: Vec<(String, String, f64, Option<f64>)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert!(rows.iter().all(|r| r.0 == "AAPL" && r.2 == 189.5 && r.3.is_none()));
        assert!(rows.windows(2).all(|w| w[0].1 <= w[1].1));
        assert_eq!(rows[0].1, "2025-03-04 09:30:00.000000");
    }

    #[test]
    fn row_holds_every_declared_column() {
        let conn = Connection::open_in_memory().unwrap();
        let snapshot = build_snapshot(
            "SPY",
            &InfoMap::new(),
            NaiveDate::from_ymd_opt(2025, 3, 4)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        );
        append_snapshot(&conn, &snapshot).unwrap();

        let nulls: i64 = conn
            .query_row(
                &format!(
                    "SELECT {} FROM stock_fundamentals",
                    FIELD_MAPPING
                        .iter()
                        .map(|f| format!("({} IS NULL)", quote_ident(f.column)))
                        .collect::<Vec<_>>()
                        .join(" + ")
                ),
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(nulls as usize, FIELD_MAPPING.len());
    }
}
