use super::response;
use crate::{
    http::client::{self, RequestError},
    model,
    source::{InfoMap, QuoteSource},
};
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde_json::{Map, Value};
use std::{collections::HashMap, sync::Mutex};

// Base URL for the quote API.
const BASE_URL: &str = "https://query2.finance.yahoo.com/";
// Page visited to obtain the session cookie required for the crumb.
const COOKIE_URL: &str = "https://fc.yahoo.com";
const REFERER: &str = "https://finance.yahoo.com/";
// quoteSummary modules that together make up the info snapshot.
const INFO_MODULES: &str = "financialData,quoteType,defaultKeyStatistics,assetProfile,summaryDetail";

/// Yahoo Finance quote source. Holds the crumb token once it has been negotiated.
#[derive(Default)]
pub struct YahooClient {
    crumb: Mutex<Option<String>>,
}

impl YahooClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn cached_crumb(&self) -> Option<String> {
        self.crumb.lock().ok().and_then(|c| c.clone())
    }

    fn forget_crumb(&self) {
        if let Ok(mut crumb) = self.crumb.lock() {
            *crumb = None;
        }
    }

    // Fetches a session cookie and the matching crumb.
    async fn crumb(&self) -> Result<String, RequestError> {
        if let Some(crumb) = self.cached_crumb() {
            return Ok(crumb);
        }

        client::touch(COOKIE_URL, HashMap::from([("referer", REFERER)])).await?;
        let crumb = client::request_text(
            &format!("{}v1/test/getcrumb", BASE_URL),
            HashMap::new(),
            HashMap::from([("referer", REFERER)]),
        )
        .await?;
        if crumb.is_empty() || crumb.contains(' ') || crumb.contains('<') {
            return Err(RequestError::Provider(format!("unusable crumb '{}'", crumb)));
        }
        log::debug!("negotiated crumb");

        if let Ok(mut cached) = self.crumb.lock() {
            *cached = Some(crumb.clone());
        }
        Ok(crumb)
    }

    async fn quote_summary(&self, symbol: &str, crumb: &str) -> Result<InfoMap, RequestError> {
        let resp = client::request::<response::QuoteSummaryResponse>(
            &format!("{}v10/finance/quoteSummary/{}", BASE_URL, symbol),
            HashMap::from([("modules", INFO_MODULES), ("crumb", crumb)]),
            HashMap::new(),
        )
        .await?;
        flatten_quote_summary(resp)
    }

    async fn quote(&self, symbol: &str, crumb: &str) -> Result<InfoMap, RequestError> {
        let resp = client::request::<response::QuoteResponse>(
            &format!("{}v7/finance/quote", BASE_URL),
            HashMap::from([("symbols", symbol), ("crumb", crumb)]),
            HashMap::new(),
        )
        .await?;
        if let Some(err) = resp.quote_response.error {
            return Err(RequestError::Provider(err.message()));
        }
        Ok(resp
            .quote_response
            .result
            .and_then(|r| r.into_iter().next())
            .unwrap_or_default())
    }
}

impl QuoteSource for YahooClient {
    /// Fetches daily bars for a symbol between two calendar dates.
    async fn daily_bars(
        &self,
        symbol: &str,     // Stock symbol.
        start: NaiveDate, // First day requested.
        end: NaiveDate,   // Exclusive end day.
    ) -> Result<Vec<model::DailyBar>, RequestError> {
        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = end.and_time(NaiveTime::MIN).and_utc().timestamp();

        let resp = client::request::<response::ChartResponse>(
            &format!("{}v8/finance/chart/{}", BASE_URL, symbol),
            HashMap::from([
                ("period1", period1.to_string().as_str()),
                ("period2", period2.to_string().as_str()),
                ("interval", "1d"),
                ("includeAdjustedClose", "true"),
                ("events", "div,splits"),
            ]),
            HashMap::new(),
        )
        .await?;
        bars_from_chart(symbol, resp)
    }

    /// Fetches the info snapshot: quoteSummary modules, topped up with v7 quote fields.
    async fn info(&self, symbol: &str) -> Result<InfoMap, RequestError> {
        let crumb = self.crumb().await?;
        let mut info = match self.quote_summary(symbol, &crumb).await {
            Ok(info) => info,
            Err(RequestError::HttpError(url, 401, body)) => {
                // Crumb expired; negotiate a new one on the next call.
                self.forget_crumb();
                return Err(RequestError::HttpError(url, 401, body));
            }
            Err(e) => return Err(e),
        };

        match self.quote(symbol, &crumb).await {
            Ok(quote) => merge_missing(&mut info, quote),
            Err(e) => log::warn!("[{}] quote endpoint failed, using summary only: {}", symbol, e),
        }
        Ok(info)
    }
}

/// Turns a chart response into bars. Rows where every price and the volume are missing are
/// non-trading days and are dropped.
pub fn bars_from_chart(
    symbol: &str,
    resp: response::ChartResponse,
) -> Result<Vec<model::DailyBar>, RequestError> {
    if let Some(err) = resp.chart.error {
        return Err(RequestError::Provider(err.message()));
    }
    let Some(data) = resp.chart.result.and_then(|r| r.into_iter().next()) else {
        return Err(RequestError::Provider("empty chart result".into()));
    };

    let offset = data.meta.gmtoffset.unwrap_or(0);
    let timestamps = data.timestamp.unwrap_or_default();
    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
    let adj_close = data
        .indicators
        .adjclose
        .and_then(|a| a.into_iter().next())
        .map(|a| a.adjclose)
        .unwrap_or_default();

    let at = |values: &Vec<Option<f64>>, i: usize| values.get(i).copied().flatten();

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let open = at(&quote.open, i);
        let high = at(&quote.high, i);
        let low = at(&quote.low, i);
        let close = at(&quote.close, i);
        let volume = quote.volume.get(i).copied().flatten();
        if open.is_none() && high.is_none() && low.is_none() && close.is_none() && volume.is_none()
        {
            continue;
        }

        let date = DateTime::from_timestamp(ts + offset, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| RequestError::Provider(format!("invalid timestamp {}", ts)))?;

        bars.push(model::DailyBar {
            date,
            ticker: symbol.to_string(),
            open,
            high,
            low,
            close,
            adj_close: at(&adj_close, i),
            volume,
        });
    }
    Ok(bars)
}

/// Merges all quoteSummary modules into one flat map. `{raw, fmt}` wrappers are reduced to the
/// raw value; empty objects and `maxAge` bookkeeping fields are dropped.
pub fn flatten_quote_summary(resp: response::QuoteSummaryResponse) -> Result<InfoMap, RequestError> {
    if let Some(err) = resp.quote_summary.error {
        return Err(RequestError::Provider(err.message()));
    }
    let Some(modules) = resp.quote_summary.result.and_then(|r| r.into_iter().next()) else {
        return Err(RequestError::Provider("empty quoteSummary result".into()));
    };

    let mut info = Map::new();
    for (_module, fields) in modules {
        let Value::Object(fields) = fields else {
            continue;
        };
        for (key, value) in fields {
            if key == "maxAge" {
                continue;
            }
            let value = match value {
                Value::Object(mut obj) => match obj.remove("raw") {
                    Some(raw) => raw,
                    None if obj.is_empty() => continue,
                    None => Value::Object(obj),
                },
                other => other,
            };
            info.entry(key).or_insert(value);
        }
    }
    Ok(info)
}

fn merge_missing(info: &mut InfoMap, extra: InfoMap) {
    for (key, value) in extra {
        info.entry(key).or_insert(value);
    }
}
