use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Deserialize, Debug)]
pub struct ProviderError {
    pub code: String,
    pub description: Option<String>,
}

impl ProviderError {
    pub fn message(&self) -> String {
        match &self.description {
            Some(description) => format!("{}: {}", self.code, description),
            None => self.code.clone(),
        }
    }
}

// v8 chart endpoint

#[derive(Deserialize, Debug)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Deserialize, Debug)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ProviderError>,
}

#[derive(Deserialize, Debug)]
pub struct ChartResult {
    pub meta: ChartMeta,
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Indicators,
}

#[derive(Deserialize, Debug)]
pub struct ChartMeta {
    // Seconds east of UTC for the listing exchange.
    pub gmtoffset: Option<i64>,
}

#[derive(Deserialize, Debug)]
pub struct Indicators {
    pub quote: Vec<QuoteIndicator>,
    pub adjclose: Option<Vec<AdjClose>>,
}

#[derive(Deserialize, Debug, Default)]
pub struct QuoteIndicator {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<i64>>,
}

#[derive(Deserialize, Debug)]
pub struct AdjClose {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

// v10 quoteSummary endpoint. Modules are kept as raw JSON objects and flattened later.

#[derive(Deserialize, Debug)]
pub struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    pub quote_summary: QuoteSummary,
}

#[derive(Deserialize, Debug)]
pub struct QuoteSummary {
    pub result: Option<Vec<Map<String, Value>>>,
    pub error: Option<ProviderError>,
}

// v7 quote endpoint.

#[derive(Deserialize, Debug)]
pub struct QuoteResponse {
    #[serde(rename = "quoteResponse")]
    pub quote_response: QuoteResult,
}

#[derive(Deserialize, Debug)]
pub struct QuoteResult {
    pub result: Option<Vec<Map<String, Value>>>,
    pub error: Option<ProviderError>,
}
