use std::collections::HashSet;

use rusqlite::Connection;
use thiserror::Error;

use super::sqlite::{quote_ident, table_exists};
use crate::{constants, fundamentals::mapping::FIELD_MAPPING};

/// Bumped whenever the declared fundamentals columns change.
pub const FUNDAMENTALS_SCHEMA_VERSION: i64 = 1;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("database schema version {found} is newer than supported version {supported}")]
    TooNew { found: i64, supported: i64 },
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Declared column of the fundamentals table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static str,
}

/// `ticker`, `time_scraped`, then every mapped column in mapping order.
pub fn fundamentals_columns() -> Vec<Column> {
    let mut columns = vec![
        Column {
            name: "ticker",
            sql_type: "TEXT NOT NULL",
        },
        Column {
            name: "time_scraped",
            sql_type: "TEXT NOT NULL",
        },
    ];
    columns.extend(FIELD_MAPPING.iter().map(|f| Column {
        name: f.column,
        sql_type: f.sql_type.as_sql(),
    }));
    columns
}

pub fn schema_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

fn existing_columns(conn: &Connection, table: &str) -> rusqlite::Result<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let names = stmt.query_map([table], |row| row.get::<_, String>(0))?;
    names.collect()
}

/// Makes sure the fundamentals table matches the declared schema: creates it when missing and
/// adds any declared column the table lacks. Never drops or rewrites data.
pub fn ensure_fundamentals_table(conn: &Connection) -> Result<(), SchemaError> {
    let table = constants::FUNDAMENTALS_TABLE;
    let found = schema_version(conn)?;
    if found > FUNDAMENTALS_SCHEMA_VERSION {
        return Err(SchemaError::TooNew {
            found,
            supported: FUNDAMENTALS_SCHEMA_VERSION,
        });
    }

    let columns = fundamentals_columns();
    if !table_exists(conn, table)? {
        let body = columns
            .iter()
            .map(|c| format!("{} {}", quote_ident(c.name), c.sql_type))
            .collect::<Vec<_>>()
            .join(",\n            ");
        conn.execute_batch(&format!(
            "CREATE TABLE {} (\n            {}\n        );
            CREATE INDEX IF NOT EXISTS idx_fundamentals_ticker_time ON {} (ticker, time_scraped);",
            quote_ident(table),
            body,
            quote_ident(table),
        ))?;
        log::info!("Created table {} (schema v{})", table, FUNDAMENTALS_SCHEMA_VERSION);
    } else {
        let existing = existing_columns(conn, table)?;
        for column in columns.iter().filter(|c| !existing.contains(c.name)) {
            // NOT NULL is only enforced on creation; added columns must accept old rows.
            let sql_type = column.sql_type.trim_end_matches(" NOT NULL");
            conn.execute(
                &format!(
                    "ALTER TABLE {} ADD COLUMN {} {}",
                    quote_ident(table),
                    quote_ident(column.name),
                    sql_type
                ),
                [],
            )?;
            log::warn!("Added missing column {}.{}", table, column.name);
        }
    }

    if found != FUNDAMENTALS_SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", FUNDAMENTALS_SCHEMA_VERSION)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_table_with_declared_columns() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_fundamentals_table(&conn).unwrap();

        let existing = existing_columns(&conn, constants::FUNDAMENTALS_TABLE).unwrap();
        assert_eq!(existing.len(), FIELD_MAPPING.len() + 2);
        assert!(existing.contains("trail_PE"));
        assert!(existing.contains("price_2_book"));
        assert_eq!(schema_version(&conn).unwrap(), FUNDAMENTALS_SCHEMA_VERSION);

        // Second call is a no-op.
        ensure_fundamentals_table(&conn).unwrap();
    }

    #[test]
    fn adds_columns_missing_from_an_older_table() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE stock_fundamentals (ticker TEXT, time_scraped TEXT, bid REAL, retired_col REAL);
             INSERT INTO stock_fundamentals (ticker, time_scraped, bid) VALUES ('AAPL', '2024-01-02 10:00:00.000000', 1.5);",
        )
        .unwrap();

        ensure_fundamentals_table(&conn).unwrap();

        let existing = existing_columns(&conn, constants::FUNDAMENTALS_TABLE).unwrap();
        assert!(existing.contains("ask"));
        assert!(existing.contains("retired_col"));
        let bid: f64 = conn
            .query_row("SELECT bid FROM stock_fundamentals", [], |row| row.get(0))
            .unwrap();
        assert_eq!(bid, 1.5);
        assert_eq!(schema_version(&conn).unwrap(), FUNDAMENTALS_SCHEMA_VERSION);
    }

    #[test]
    fn refuses_newer_schema() {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", FUNDAMENTALS_SCHEMA_VERSION + 1)
            .unwrap();
        assert!(matches!(
            ensure_fundamentals_table(&conn),
            Err(SchemaError::TooNew { .. })
        ));
    }
}
