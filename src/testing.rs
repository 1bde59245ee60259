// In-process fakes for the provider and the clock.

use std::{
    collections::HashSet,
    sync::Mutex,
    time::Duration,
};

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde_json::json;

use crate::{
    clock::Clock,
    http::client::RequestError,
    model::DailyBar,
    source::{InfoMap, QuoteSource},
};

/// Provider returning canned data; symbols in `failing` error out.
#[derive(Default)]
pub struct FakeSource {
    pub failing: HashSet<String>,
    pub empty: HashSet<String>,
    pub info_calls: Mutex<Vec<String>>,
    pub bar_calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn failing(symbols: &[&str]) -> Self {
        Self {
            failing: symbols.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn info_call_count(&self) -> usize {
        self.info_calls.lock().unwrap().len()
    }

    fn check(&self, symbol: &str) -> Result<(), RequestError> {
        if self.failing.contains(symbol) {
            return Err(RequestError::Provider(format!("{} not found", symbol)));
        }
        Ok(())
    }
}

impl QuoteSource for FakeSource {
    async fn daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>, RequestError> {
        self.bar_calls.lock().unwrap().push(symbol.to_string());
        self.check(symbol)?;
        if self.empty.contains(symbol) {
            return Ok(vec![]);
        }
        Ok(start
            .iter_days()
            .take_while(|d| *d < end)
            .enumerate()
            .map(|(i, date)| DailyBar {
                date,
                ticker: symbol.to_string(),
                open: Some(100.0 + i as f64),
                high: Some(101.0 + i as f64),
                low: Some(99.0 + i as f64),
                close: Some(100.5 + i as f64),
                adj_close: Some(100.5 + i as f64),
                volume: Some(1_000 + i as i64),
            })
            .collect())
    }

    async fn info(&self, symbol: &str) -> Result<InfoMap, RequestError> {
        self.info_calls.lock().unwrap().push(symbol.to_string());
        self.check(symbol)?;
        if self.empty.contains(symbol) {
            return Ok(InfoMap::new());
        }
        let mut info = InfoMap::new();
        info.insert("bid".into(), json!(189.5));
        info.insert("currency".into(), json!("USD"));
        info.insert("epsTrailing".into(), json!(6.4));
        Ok(info)
    }
}

/// Simulated clock: `sleep` advances time instantly.
pub struct FakeClock {
    now: Mutex<NaiveDateTime>,
    pub sleeps: Mutex<Vec<Duration>>,
}

impl FakeClock {
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
            sleeps: Mutex::new(vec![]),
        }
    }
}

impl Clock for FakeClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        let mut now = self.now.lock().unwrap();
        *now += TimeDelta::from_std(duration).unwrap();
    }
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}
