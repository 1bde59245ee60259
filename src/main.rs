// Market data collector: end-of-day bars and intraday fundamentals snapshots into SQLite.
mod yahoo {
    // Quote source backed by the Yahoo Finance endpoints.
    pub mod api_caller;
    // Response structures for the Yahoo Finance endpoints.
    pub mod response;
}
// HTTP client module.
mod http {
    // HTTP client implementation.
    pub mod client;
}
mod fundamentals {
    /// Scheduled fundamentals polling job.
    pub mod job;
    /// Provider field -> column table.
    pub mod mapping;
    /// Snapshot builder.
    pub mod snapshot;
}
// Data storage module.
mod store {
    /// Daily bar tables, replaced wholesale.
    pub mod daily_bar;
    /// Append-only fundamentals table.
    pub mod fundamentals;
    /// Declared, versioned fundamentals schema.
    pub mod schema;
    /// SQLite database interaction.
    pub mod sqlite;
}
mod clock;
mod config;
// module storing defaults
mod constants;
// Daily bars job.
mod daily;
// Data models.
mod model;
mod run_log;
mod scheduler;
mod source;
mod symbols;
#[cfg(test)]
mod testing;

use std::{fs, path::Path, process};

use chrono::Local;
use clap::{Parser, Subcommand};
use dotenv::dotenv;

use crate::{clock::SystemClock, config::Config, run_log::RunLogger, yahoo::api_caller::YahooClient};

// Command-line argument parser.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

// Subcommands for the application.
#[derive(Subcommand, Debug)]
enum Commands {
    // Download the full daily history of every ticker, replacing each symbol's table.
    PullDaily {
        #[arg(long)]
        symbols_file: Option<String>,
    },
    // Poll fundamentals during market hours until the exit time.
    PollFundamentals {
        #[arg(long)]
        symbols_file: Option<String>,
    },
}

fn fatal(message: &str) -> ! {
    log::error!("{}", message);
    process::exit(1);
}

fn resolve_tickers(symbols_file: Option<String>, defaults: &[String]) -> Vec<String> {
    match symbols_file {
        Some(path) => symbols::read_symbols_from_file(&path)
            .unwrap_or_else(|err| fatal(&format!("Error reading symbols: {}", err))),
        None => defaults.to_vec(),
    }
}

// Creates the target folder before anything is logged into it.
fn prepare_folder(folder: &Path) -> Option<String> {
    if folder.exists() {
        return None;
    }
    if let Err(err) = fs::create_dir_all(folder) {
        fatal(&format!("Error creating {}: {}", folder.display(), err));
    }
    Some(format!("Created directory: {}", folder.display()))
}

#[tokio::main]
// Main function entry point.
async fn main() {
    dotenv().ok();

    env_logger::init();

    let args = Args::parse();

    let config = Config::from_env()
        .unwrap_or_else(|err| fatal(&format!("Invalid configuration: {}", err)));

    let created = prepare_folder(&config.target_folder);
    let logger = RunLogger::new(Some(config.log_path()));
    if let Some(message) = created {
        logger.log(&message);
    }
    let source = YahooClient::new();

    match args.command {
        Commands::PullDaily { symbols_file } => {
            let tickers = resolve_tickers(symbols_file, &config.daily_tickers);
            let report = daily::pull_and_save(
                &tickers,
                &config.daily_db_path(),
                config.history_start,
                Local::now().date_naive(),
                &source,
                &logger,
            )
            .await;
            log::info!(
                "Daily pull finished: {} saved, {} failed {:?}",
                report.succeeded(),
                report.failed(),
                report.failed_symbols()
            );
        }

        Commands::PollFundamentals { symbols_file } => {
            let tickers = resolve_tickers(symbols_file, &config.fundamentals_tickers);
            let clock = SystemClock::new(config.market.timezone);
            let cycles = scheduler::run(
                &config.market,
                &tickers,
                &config.fundamentals_db_path(),
                &source,
                &clock,
                &logger,
            )
            .await;
            log::info!("Scheduler exited after {} cycles", cycles);
        }
    }
}
