/// Storage affinity declared for a snapshot column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Real,
    Integer,
    Text,
}

impl SqlType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Real => "REAL",
            SqlType::Integer => "INTEGER",
            SqlType::Text => "TEXT",
        }
    }
}

/// One provider field and the column it is stored under.
#[derive(Debug, Clone, Copy)]
pub struct FieldMapping {
    pub source: &'static str,
    pub column: &'static str,
    pub sql_type: SqlType,
}

const fn field(source: &'static str, column: &'static str, sql_type: SqlType) -> FieldMapping {
    FieldMapping {
        source,
        column,
        sql_type,
    }
}

use SqlType::{Integer, Real, Text};

/// Provider field name -> snapshot column, in column order.
pub const FIELD_MAPPING: &[FieldMapping] = &[
    field("last_price", "last", Real),
    field("bid", "bid", Real),
    field("ask", "ask", Real),
    field("bidSize", "bid_size", Integer),
    field("askSize", "ask_size", Integer),
    field("currentPrice", "current_price", Real),
    field("targetHighPrice", "target_high_price", Real),
    field("targetLowPrice", "target_low_price", Real),
    field("targetMeanPrice", "target_mean_price", Real),
    field("targetMedianPrice", "target_median_price", Real),
    field("recommendationKey", "recommendation_key", Text),
    field("numberOfAnalystOpinions", "number_of_analyst_opinions", Integer),
    field("lastDividendValue", "last_dividend_value", Real),
    field("lastDividendDate", "last_dividend_date", Integer),
    field("totalCash", "total_cash", Integer),
    field("totalCashPerShare", "total_cash_per_share", Real),
    field("ebitda", "ebitda", Integer),
    field("totalDebt", "total_debt", Integer),
    field("quickRatio", "quick_ratio", Real),
    field("currentRatio", "current_ratio", Real),
    field("totalRevenue", "total_revenue", Integer),
    field("debtToEquity", "debt_to_equity", Real),
    field("revenuePerShare", "revenue_per_share", Real),
    field("returnOnAssets", "return_on_assets", Real),
    field("returnOnEquity", "return_on_equity", Real),
    field("grossProfits", "gross_profits", Integer),
    field("freeCashflow", "free_cashflow", Integer),
    field("operatingCashflow", "operating_cashflow", Integer),
    field("earningsGrowth", "earnings_growth", Real),
    field("revenueGrowth", "revenue_growth", Real),
    field("grossMargins", "gross_margins", Real),
    field("ebitdaMargins", "ebitda_margins", Real),
    field("operatingMargins", "operating_margins", Real),
    field("regularMarketChange", "regular_market_change", Real),
    field("regularMarketChangePercent", "regular_market_change_percent", Real),
    field("regularMarketPrice", "regular_market_price", Real),
    field("postMarketChangePercent", "post_market_change_percent", Real),
    field("postMarketPrice", "post_market_price", Real),
    field("postMarketChange", "post_market_change", Real),
    field("averageDailyVolume3Month", "average_daily_volume_3_month", Integer),
    field("open", "open_price", Real),
    field("dayLow", "day_low", Real),
    field("dayHigh", "day_high", Real),
    field("regularMarketPreviousClose", "regular_market_previous_close", Real),
    field("regularMarketOpen", "regular_market_open", Real),
    field("regularMarketDayLow", "regular_market_day_low", Real),
    field("regularMarketDayHigh", "regular_market_day_high", Real),
    field("dividendRate", "dividend_rate", Real),
    field("dividendYield", "dividend_yield", Real),
    field("trailingPE", "trail_PE", Real),
    field("forwardPE", "forward_PE", Real),
    field("trailingEps", "trail_Eps", Real),
    field("forwardEps", "forward_Eps", Real),
    field("previous_close", "prev_close", Real),
    field("volume", "volume", Integer),
    field("regularMarketVolume", "reg_market_volume", Integer),
    field("averageVolume", "avg_volume", Integer),
    field("averageVolume10days", "ave_10d_volume", Integer),
    field("currency", "currency", Text),
    field("exchange", "exchange", Text),
    field("profitMargins", "profit_margin", Real),
    field("floatShares", "float_shares", Integer),
    field("enterpriseValue", "company_value", Integer),
    field("sharesOutstanding", "outstanding_share", Integer),
    field("sharesShort", "share_short", Integer),
    field("sharesPercentSharesOut", "share_percent_shares_out", Real),
    field("heldPercentInsiders", "insider_held_percent", Real),
    field("heldPercentInstitutions", "institution_held_percent", Real),
    field("shortRatio", "short_ratio", Real),
    field("shortPercentOfFloat", "short_percent_of_float", Real),
    field("impliedSharesOutstanding", "implied_shares_outstanding", Integer),
    field("bookValue", "book_value", Real),
    field("priceToBook", "price_2_book", Real),
];

/// Column -> secondary provider field, read only when the primary one is missing.
pub const FALLBACKS: &[(&str, &str)] = &[
    ("trail_Eps", "epsTrailing"),
    ("forward_Eps", "epsForward"),
    ("volume", "last_volume"),
];

pub fn fallback_for(column: &str) -> Option<&'static str> {
    FALLBACKS
        .iter()
        .find(|(c, _)| *c == column)
        .map(|(_, source)| *source)
}
