use std::path::Path;

use chrono::{Datelike, NaiveDateTime, Weekday};

use crate::{
    clock::Clock,
    config::MarketHours,
    fundamentals::job,
    run_log::RunLogger,
    source::QuoteSource,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleReason {
    Weekend,
    OutsideWindow,
    // A tick arrived before a full poll interval had passed since the last run.
    RecentlyRan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Idle(IdleReason),
    Run,
    Terminate,
}

/// Decides what a scheduler tick at `now` should do. The window bounds are inclusive and the
/// exit cutoff is checked before anything else.
pub fn decide(now: NaiveDateTime, last_run: Option<NaiveDateTime>, hours: &MarketHours) -> Decision {
    let time = now.time();
    if time >= hours.exit {
        return Decision::Terminate;
    }
    if matches!(now.weekday(), Weekday::Sat | Weekday::Sun) {
        return Decision::Idle(IdleReason::Weekend);
    }
    if time < hours.open || time > hours.close {
        return Decision::Idle(IdleReason::OutsideWindow);
    }
    if let Some(last) = last_run {
        let ran_recently = (now - last)
            .to_std()
            .map(|elapsed| elapsed < hours.poll_interval)
            .unwrap_or(true); // clock moved backwards
        if ran_recently {
            return Decision::Idle(IdleReason::RecentlyRan);
        }
    }
    Decision::Run
}

/// Polls fundamentals for `tickers` once per interval while the market is open, until the
/// exit cutoff. Returns the number of cycles run.
pub async fn run<S: QuoteSource, C: Clock>(
    hours: &MarketHours,
    tickers: &[String],
    db_path: &Path,
    source: &S,
    clock: &C,
    logger: &RunLogger,
) -> usize {
    logger.log(&format!(
        "Scheduler Started. Waiting for market hours (Mon-Fri, {}-{})...",
        hours.open.format("%H:%M"),
        hours.close.format("%H:%M")
    ));

    let mut last_run = None;
    let mut cycles = 0;
    loop {
        let now = clock.now();
        match decide(now, last_run, hours) {
            Decision::Terminate => {
                logger.log(&format!(
                    "Current time is {}. Past exit time. Exiting program.",
                    now.format("%H:%M")
                ));
                break;
            }
            Decision::Run => {
                logger.log("--- Starting Scheduled Run ---");
                let report = job::run_cycle(tickers, db_path, source, clock, logger).await;
                logger.log(&format!(
                    "--- Run Complete ({} saved, {} failed) ---",
                    report.succeeded(),
                    report.failed()
                ));
                last_run = Some(now);
                cycles += 1;
            }
            Decision::Idle(IdleReason::OutsideWindow) => {
                logger.status(&format!(
                    "Market Closed. Current time: {}. Waiting...",
                    now.format("%H:%M:%S")
                ));
            }
            Decision::Idle(reason) => log::debug!("idle: {:?}", reason),
        }
        clock.sleep(hours.poll_interval).await;
    }
    cycles
}
