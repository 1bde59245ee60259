use std::{path::PathBuf, time::Duration};

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use thiserror::Error;

use crate::constants;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for '{key}': {value} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("'{0}' must contain at least one ticker")]
    EmptyTickerList(&'static str),
    #[error("market window is inverted: open {open} is after close {close}")]
    InvertedWindow { open: NaiveTime, close: NaiveTime },
    #[error("symbols file {0}: {1}")]
    SymbolsFile(String, String),
}

/// Trading session used by the fundamentals scheduler.
#[derive(Debug, Clone)]
pub struct MarketHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
    /// Wall-clock cutoff after which the scheduler exits.
    pub exit: NaiveTime,
    pub poll_interval: Duration,
    pub timezone: Tz,
}

/// Runtime configuration shared by both jobs.
#[derive(Debug, Clone)]
pub struct Config {
    pub target_folder: PathBuf,
    pub daily_db_name: String,
    pub fundamentals_db_name: String,
    pub log_file_name: String,
    pub daily_tickers: Vec<String>,
    pub fundamentals_tickers: Vec<String>,
    pub history_start: NaiveDate,
    pub market: MarketHours,
}

impl Config {
    /// Builds the configuration from process environment variables, falling back to the
    /// compiled defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| -> String {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let daily_tickers = match lookup("daily_tickers") {
            Some(list) => parse_tickers("daily_tickers", &list)?,
            None => owned(constants::DAILY_TICKERS),
        };
        let fundamentals_tickers = match lookup("fundamentals_tickers") {
            Some(list) => parse_tickers("fundamentals_tickers", &list)?,
            None => owned(constants::FUNDAMENTALS_TICKERS),
        };

        let history_start = get("history_start", constants::HISTORY_START);
        let history_start = NaiveDate::parse_from_str(&history_start, "%Y-%m-%d").map_err(|e| {
            ConfigError::InvalidValue {
                key: "history_start",
                value: history_start.clone(),
                reason: e.to_string(),
            }
        })?;

        let open = parse_time("market_open", &get("market_open", constants::MARKET_OPEN))?;
        let close = parse_time("market_close", &get("market_close", constants::MARKET_CLOSE))?;
        let exit = parse_time("exit_time", &get("exit_time", constants::EXIT_TIME))?;
        if open > close {
            return Err(ConfigError::InvertedWindow { open, close });
        }

        let interval = get(
            "poll_interval_secs",
            &constants::POLL_INTERVAL_SECS.to_string(),
        );
        let interval_secs: u64 = interval.parse().map_err(|e: std::num::ParseIntError| {
            ConfigError::InvalidValue {
                key: "poll_interval_secs",
                value: interval.clone(),
                reason: e.to_string(),
            }
        })?;
        if interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "poll_interval_secs",
                value: interval,
                reason: "must be greater than zero".into(),
            });
        }

        let tz_name = get("market_timezone", constants::MARKET_TIMEZONE);
        let timezone: Tz = tz_name.parse().map_err(|e| ConfigError::InvalidValue {
            key: "market_timezone",
            value: tz_name.clone(),
            reason: format!("{}", e),
        })?;

        Ok(Config {
            target_folder: PathBuf::from(get("target_folder", constants::DEFAULT_TARGET_FOLDER)),
            daily_db_name: get("daily_db_name", constants::DAILY_DB_NAME),
            fundamentals_db_name: get("fundamentals_db_name", constants::FUNDAMENTALS_DB_NAME),
            log_file_name: get("log_file_name", constants::LOG_FILE_NAME),
            daily_tickers,
            fundamentals_tickers,
            history_start,
            market: MarketHours {
                open,
                close,
                exit,
                poll_interval: Duration::from_secs(interval_secs),
                timezone,
            },
        })
    }

    pub fn daily_db_path(&self) -> PathBuf {
        self.target_folder.join(&self.daily_db_name)
    }

    pub fn fundamentals_db_path(&self) -> PathBuf {
        self.target_folder.join(&self.fundamentals_db_name)
    }

    pub fn log_path(&self) -> PathBuf {
        self.target_folder.join(&self.log_file_name)
    }
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn parse_tickers(key: &'static str, list: &str) -> Result<Vec<String>, ConfigError> {
    let tickers: Vec<String> = list
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_uppercase())
        .collect();
    if tickers.is_empty() {
        return Err(ConfigError::EmptyTickerList(key));
    }
    Ok(tickers)
}

fn parse_time(key: &'static str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|e| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_with(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_constants() {
        let config = config_with(&[]).unwrap();
        assert_eq!(config.daily_tickers.len(), constants::DAILY_TICKERS.len());
        assert_eq!(
            config.fundamentals_tickers.last().map(String::as_str),
            Some("SQQQ")
        );
        assert_eq!(config.market.open, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(config.market.close, NaiveTime::from_hms_opt(16, 0, 0).unwrap());
        assert_eq!(config.market.exit, NaiveTime::from_hms_opt(16, 10, 0).unwrap());
        assert_eq!(config.market.poll_interval, Duration::from_secs(600));
        assert_eq!(config.history_start, NaiveDate::from_ymd_opt(2001, 1, 1).unwrap());
        assert_eq!(
            config.fundamentals_db_path(),
            PathBuf::from("./Daily_DB/market_data_fundamentals.db")
        );
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_with(&[
            ("target_folder", "/tmp/market"),
            ("fundamentals_tickers", " aapl, msft ,,brk-b "),
            ("market_open", "09:00:30"),
            ("poll_interval_secs", "60"),
            ("market_timezone", "Europe/London"),
        ])
        .unwrap();
        assert_eq!(config.fundamentals_tickers, vec!["AAPL", "MSFT", "BRK-B"]);
        assert_eq!(config.market.open, NaiveTime::from_hms_opt(9, 0, 30).unwrap());
        assert_eq!(config.market.poll_interval, Duration::from_secs(60));
        assert_eq!(config.log_path(), PathBuf::from("/tmp/market/scheduler_log.txt"));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config_with(&[("daily_tickers", " , ")]),
            Err(ConfigError::EmptyTickerList("daily_tickers"))
        ));
        assert!(matches!(
            config_with(&[("market_close", "25:00")]),
            Err(ConfigError::InvalidValue { key: "market_close", .. })
        ));
        assert!(matches!(
            config_with(&[("market_open", "17:00")]),
            Err(ConfigError::InvertedWindow { .. })
        ));
        assert!(matches!(
            config_with(&[("poll_interval_secs", "0")]),
            Err(ConfigError::InvalidValue { key: "poll_interval_secs", .. })
        ));
        assert!(config_with(&[("market_timezone", "Mars/Olympus")]).is_err());
    }
}
