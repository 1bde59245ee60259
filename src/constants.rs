// Compiled-in defaults. Every value can be overridden through the environment (see config.rs).

pub const DEFAULT_TARGET_FOLDER: &str = "./Daily_DB";

pub const DAILY_DB_NAME: &str = "market_data_daily.db";
pub const FUNDAMENTALS_DB_NAME: &str = "market_data_fundamentals.db";
pub const LOG_FILE_NAME: &str = "scheduler_log.txt";

/// Shared append-only table holding every fundamentals snapshot.
pub const FUNDAMENTALS_TABLE: &str = "stock_fundamentals";

pub const DAILY_TICKERS: &[&str] = &[
    "SPY", "NVDA", "AAPL", "MSFT", "AMZN", "GOOGL", "META", "TSLA", "BRK-B", "JPM", "AVGO", "INTC",
    "WMT", "UNH", "V", "PYPL", "MA", "HD", "BAC", "COST", "DIS", "TSM", "ARM", "BABA",
];

pub const FUNDAMENTALS_TICKERS: &[&str] = &[
    "SPY", "NVDA", "AAPL", "MSFT", "AMZN", "GOOGL", "META", "TSLA", "BRK-B", "JPM", "AVGO", "INTC",
    "WMT", "UNH", "V", "PYPL", "MA", "HD", "BAC", "COST", "DIS", "QQQ", "SQQQ",
];

// First date requested by the daily-bars job.
pub const HISTORY_START: &str = "2001-01-01";

// Market session, expressed in MARKET_TIMEZONE.
pub const MARKET_OPEN: &str = "09:30";
pub const MARKET_CLOSE: &str = "16:00";
// 10 minutes after the close so the last run can finish.
pub const EXIT_TIME: &str = "16:10";
pub const MARKET_TIMEZONE: &str = "America/New_York";

pub const POLL_INTERVAL_SECS: u64 = 600;
