use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Source of wall-clock time for the scheduler and snapshot timestamps.
pub trait Clock {
    /// Current local time in the market's time zone.
    fn now(&self) -> NaiveDateTime;

    async fn sleep(&self, duration: Duration);
}

pub struct SystemClock {
    timezone: Tz,
}

impl SystemClock {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await
    }
}
