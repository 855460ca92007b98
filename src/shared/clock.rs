//! Time source
//!
//! Booking dates and times are local wall-clock values, so "today" and
//! "now" come from the local timezone. Audit timestamps stay in UTC.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};

pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;

    fn now_local(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now_local().date()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn now_local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Frozen clock for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    local: NaiveDateTime,
}

impl FixedClock {
    pub fn new(local: NaiveDateTime) -> Self {
        Self { local }
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.local.and_utc()
    }

    fn now_local(&self) -> NaiveDateTime {
        self.local
    }
}
