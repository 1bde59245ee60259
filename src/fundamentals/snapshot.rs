use chrono::NaiveDateTime;
use serde_json::Value;

use super::mapping::{self, FIELD_MAPPING};
use crate::source::InfoMap;

pub const TIME_SCRAPED_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One point-in-time capture of a symbol's mapped fundamentals.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub ticker: String,
    pub time_scraped: NaiveDateTime,
    /// Mapped columns in `FIELD_MAPPING` order. `Value::Null` when the provider had nothing.
    pub fields: Vec<(&'static str, Value)>,
}

impl Snapshot {
    pub fn time_scraped_text(&self) -> String {
        self.time_scraped.format(TIME_SCRAPED_FORMAT).to_string()
    }
}

fn present<'a>(info: &'a InfoMap, key: &str) -> Option<&'a Value> {
    info.get(key).filter(|v| !v.is_null())
}

/// Builds the snapshot for `symbol` from a provider info map. Unknown keys are ignored and
/// missing ones become null; values are not validated.
pub fn build_snapshot(symbol: &str, info: &InfoMap, now: NaiveDateTime) -> Snapshot {
    let fields = FIELD_MAPPING
        .iter()
        .map(|f| {
            let value = present(info, f.source)
                .or_else(|| mapping::fallback_for(f.column).and_then(|alt| present(info, alt)))
                .cloned()
                .unwrap_or(Value::Null);
            (f.column, value)
        })
        .collect();

    Snapshot {
        ticker: symbol.to_string(),
        time_scraped: now,
        fields,
    }
}
